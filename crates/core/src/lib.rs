pub mod config;
pub mod errors;
pub mod models;
pub mod rules;

pub use config::{AppConfig, RemoteConfig, ResolutionConfig, RetryPolicy, ServerConfig};
pub use errors::{GatewayError, GatewayResult};
pub use models::{
    ActivityEntry, AutomationResult, ClassificationResult, FieldMap, IncidentRequest,
    IncidentResponse, Priority, ResolvedTicket, TicketRecord, TicketState,
};
pub use rules::{ClassificationRule, RuleTable};

/// Line prefix that marks a structured automation entry inside a ticket's
/// work-notes journal. Activity reconstruction keys off this exact prefix.
pub const AUTOMATION_MARKER: &str = "[AUTO] ";

/// Line prefix inside the composed long text that carries the client name.
pub const CLIENT_MARKER: &str = "Client: ";

/// Line prefix inside the composed long text that carries the error code.
pub const ERROR_CODE_MARKER: &str = "Error Code: ";
