use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the reconstructed automation activity feed. Derived by
/// scanning ticket work notes; never stored separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub ticket_number: String,
    pub client: Option<String>,
    pub summary: String,
    pub ticket_id: String,
}
