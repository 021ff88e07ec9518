use serde::{Deserialize, Serialize};

/// Result of classifying one incident: a topic label plus an ordered list
/// of self-service resources. Never persisted on its own; only its text
/// projection lands in the ticket's work notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub topic: String,
    pub resources: Vec<String>,
}

impl ClassificationResult {
    pub fn new(topic: impl Into<String>, resources: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            resources,
        }
    }

    /// Topic returned when no rule matched at all.
    pub fn unclassified() -> Self {
        Self {
            topic: "Unclassified / Manual Review".to_string(),
            resources: Vec::new(),
        }
    }
}

/// Outcome of a category-specific automation run, folded into the incident
/// response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationResult {
    pub classified: bool,
    pub email_sent: bool,
    pub provider: Option<String>,
    pub work_note_written: bool,
    pub classification: ClassificationResult,
}
