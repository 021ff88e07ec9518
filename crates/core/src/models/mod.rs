pub mod activity;
pub mod classification;
pub mod request;
pub mod ticket;

pub use activity::ActivityEntry;
pub use classification::{AutomationResult, ClassificationResult};
pub use request::{IncidentRequest, IncidentResponse};
pub use ticket::{FieldMap, Priority, ResolvedTicket, TicketRecord, TicketState};
