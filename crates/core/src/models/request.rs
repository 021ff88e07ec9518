use serde::{Deserialize, Serialize};

use super::classification::AutomationResult;

/// Inbound support-request payload, as posted by the client-facing form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentRequest {
    #[serde(default)]
    pub caller_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub error_code: String,
    /// Client/source name recorded in the composed long text so listing and
    /// activity queries can recover it later.
    #[serde(default)]
    pub source: String,
}

/// Enriched response assembled by the orchestrator after ticket creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentResponse {
    pub ticket_id: String,
    pub ticket_number: String,
    pub category: String,
    pub short_description: String,
    pub priority: String,
    pub topic: String,
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automation: Option<AutomationResult>,
}
