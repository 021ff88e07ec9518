use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use ticketgate_core::{
    AutomationResult, ClassificationResult, GatewayResult, IncidentRequest, AUTOMATION_MARKER,
};

use crate::notify::Mailer;
use crate::store::TicketStore;

/// A category-specific, fully scripted handling path. Automations own
/// their topic and resource data; they do not consult the generic
/// classification engine.
#[async_trait]
pub trait Automation: Send + Sync {
    async fn run(
        &self,
        request: &IncidentRequest,
        ticket_id: &str,
        ticket_number: &str,
        resolved_email: Option<&str>,
    ) -> GatewayResult<AutomationResult>;
}

/// Read-only category-to-automation map, built once at startup. Dispatch
/// is an explicit map lookup, nothing reflective.
#[derive(Clone, Default)]
pub struct AutomationRegistry {
    entries: HashMap<String, Arc<dyn Automation>>,
}

impl AutomationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard registry: exactly one mapping today.
    pub fn with_defaults(store: Arc<dyn TicketStore>, mailer: Arc<dyn Mailer>) -> Self {
        let mut registry = Self::new();
        registry.register(
            "Automation",
            Arc::new(ProvisioningAutomation::new(store, mailer)),
        );
        registry
    }

    pub fn register(&mut self, category: &str, automation: Arc<dyn Automation>) {
        self.entries.insert(category.to_string(), automation);
    }

    pub fn has_automation(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    pub fn get(&self, category: &str) -> Option<Arc<dyn Automation>> {
        self.entries.get(category).cloned()
    }
}

/// The provisioning intake automation: fixed classification, acknowledgement
/// attempt, and one structured work note.
pub struct ProvisioningAutomation {
    store: Arc<dyn TicketStore>,
    mailer: Arc<dyn Mailer>,
}

impl ProvisioningAutomation {
    pub const TOPIC: &'static str = "Automated Provisioning Intake";

    pub fn new(store: Arc<dyn TicketStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    fn resources() -> Vec<String> {
        vec![
            "What the provisioning robot does (kb/provisioning)".to_string(),
            "Tracking an onboarding request (kb/onboarding-status)".to_string(),
            "Access packages by role (kb/role-access)".to_string(),
        ]
    }

    fn compose_note(email_sent: bool, email: Option<&str>) -> String {
        let email_line = match (email, email_sent) {
            (Some(addr), true) => format!("Acknowledgement email sent to {addr}"),
            (Some(addr), false) => format!("Acknowledgement email to {addr}: not sent"),
            (None, _) => "Acknowledgement email: no contact resolved".to_string(),
        };
        let mut note = format!(
            "{AUTOMATION_MARKER}Provisioning intake classified as '{}'\n{email_line}\nRecommended resources:",
            Self::TOPIC
        );
        for resource in Self::resources() {
            note.push_str("\n- ");
            note.push_str(&resource);
        }
        note
    }
}

#[async_trait]
impl Automation for ProvisioningAutomation {
    async fn run(
        &self,
        _request: &IncidentRequest,
        ticket_id: &str,
        ticket_number: &str,
        resolved_email: Option<&str>,
    ) -> GatewayResult<AutomationResult> {
        let classification = ClassificationResult::new(Self::TOPIC, Self::resources());

        let email_sent = match resolved_email {
            Some(email) => match self.mailer.send_ack(email, ticket_number, Self::TOPIC).await {
                Ok(sent) => sent,
                Err(e) => {
                    warn!(ticket_id, error = %e, "acknowledgement send failed");
                    false
                }
            },
            None => false,
        };

        // The note is written regardless of the email outcome; the
        // email-status line keeps the journal honest about it.
        let note = Self::compose_note(email_sent, resolved_email);
        let work_note_written = match self.store.append_work_note(ticket_id, &note).await {
            Ok(()) => true,
            Err(e) => {
                warn!(ticket_id, error = %e, "automation work note write failed");
                false
            }
        };

        Ok(AutomationResult {
            classified: true,
            email_sent,
            provider: self.mailer.provider(),
            work_note_written,
            classification,
        })
    }
}
