use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Partial-update field map sent to and received from the remote table API.
/// The remote platform stringifies most values, so readers must tolerate
/// string-encoded numbers.
pub type FieldMap = serde_json::Map<String, Value>;

/// Ticket lifecycle state, mirroring the remote platform's numeric choice
/// list. `Resolved` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketState {
    New,
    InProgress,
    OnHold,
    Awaiting,
    ResolvedIntermediate,
    Resolved,
    Canceled,
}

impl TicketState {
    pub fn as_code(&self) -> &'static str {
        match self {
            TicketState::New => "1",
            TicketState::InProgress => "2",
            TicketState::OnHold => "3",
            TicketState::Awaiting => "4",
            TicketState::ResolvedIntermediate => "5",
            TicketState::Resolved => "6",
            TicketState::Canceled => "7",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(TicketState::New),
            "2" => Some(TicketState::InProgress),
            "3" => Some(TicketState::OnHold),
            "4" => Some(TicketState::Awaiting),
            "5" => Some(TicketState::ResolvedIntermediate),
            "6" => Some(TicketState::Resolved),
            "7" => Some(TicketState::Canceled),
            _ => None,
        }
    }

    /// A terminal ticket is never transitioned again by this system.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketState::Resolved | TicketState::Canceled)
    }
}

/// Three-level priority label mapped to the remote numeric code.
/// Unknown labels fall back to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_code(&self) -> &'static str {
        match self {
            Priority::High => "1",
            Priority::Medium => "2",
            Priority::Low => "3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A ticket record as read back from the remote table API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub sys_id: String,
    pub number: String,
    pub short_description: String,
    pub description: String,
    pub state: TicketState,
    pub priority: String,
    pub category: String,
    pub caller_id: String,
    pub caller_email: String,
    pub work_notes: String,
    pub updated_on: Option<DateTime<Utc>>,
}

impl TicketRecord {
    /// Build a record from a remote field map. Missing fields default to
    /// empty strings; an unrecognized state code defaults to `New` so a
    /// malformed remote echo never aborts a read path.
    pub fn from_fields(fields: &FieldMap) -> Self {
        let state = TicketState::from_code(&str_field(fields, "state"))
            .unwrap_or(TicketState::New);
        Self {
            sys_id: str_field(fields, "sys_id"),
            number: str_field(fields, "number"),
            short_description: str_field(fields, "short_description"),
            description: str_field(fields, "description"),
            state,
            priority: str_field(fields, "priority"),
            category: str_field(fields, "category"),
            caller_id: str_field(fields, "caller_id"),
            caller_email: str_field(fields, "caller_email"),
            work_notes: str_field(fields, "work_notes"),
            updated_on: parse_remote_timestamp(&str_field(fields, "sys_updated_on")),
        }
    }
}

/// Outcome of the idempotent resolution operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedTicket {
    pub ticket: TicketRecord,
    pub already_resolved: bool,
}

fn str_field(fields: &FieldMap, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// The remote platform reports timestamps as `YYYY-MM-DD HH:MM:SS` in UTC;
/// RFC 3339 is accepted as well for tolerance.
fn parse_remote_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
