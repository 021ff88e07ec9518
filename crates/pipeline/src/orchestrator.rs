use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use ticketgate_core::{
    FieldMap, GatewayError, GatewayResult, IncidentRequest, IncidentResponse, Priority,
    RuleTable, TicketRecord, TicketState, AUTOMATION_MARKER, CLIENT_MARKER, ERROR_CODE_MARKER,
};
use ticketgate_remote::RecordQuery;

use crate::automation::AutomationRegistry;
use crate::classify::classify;
use crate::contact::resolve_contact;
use crate::store::{TicketStore, TICKET_FIELDS};

/// Page-size ceiling for list and stats scans.
const MAX_PAGE_SIZE: u32 = 200;

/// Aggregate ticket counts for the stats surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: u64,
    pub by_state: BTreeMap<String, u64>,
}

/// Top-level intake pipeline over one request:
/// resolve contact, create the remote ticket, dispatch automation or fall
/// back to generic classification, annotate, assemble the response.
pub struct IncidentService {
    store: Arc<dyn TicketStore>,
    rules: Arc<RuleTable>,
    automations: AutomationRegistry,
}

impl IncidentService {
    pub fn new(
        store: Arc<dyn TicketStore>,
        rules: Arc<RuleTable>,
        automations: AutomationRegistry,
    ) -> Self {
        Self {
            store,
            rules,
            automations,
        }
    }

    pub async fn create_incident(
        &self,
        request: &IncidentRequest,
    ) -> GatewayResult<IncidentResponse> {
        // The HTTP layer validates first; these guards keep the pipeline
        // safe when driven directly.
        if request.short_description.trim().is_empty() {
            return Err(GatewayError::Validation(
                "short_description must not be empty".to_string(),
            ));
        }
        if !self.rules.is_known_category(&request.category) {
            return Err(GatewayError::Validation(format!(
                "unknown category '{}'",
                request.category
            )));
        }

        let resolved_email = resolve_contact(request);
        let priority = Priority::parse_label(&request.priority);
        let long_text = compose_long_text(request);

        // Remote create is all-or-nothing from this system's point of view;
        // there is no local state to roll back.
        let ticket = self.create_ticket(request, priority, &long_text).await?;
        info!(
            ticket_id = %ticket.sys_id,
            number = %ticket.number,
            category = %request.category,
            "ticket created"
        );

        // An erring automation degrades to the generic classification path;
        // the ticket already exists and the request must not fail over an
        // enrichment step.
        let outcome = match self.automations.get(&request.category) {
            Some(automation) => match automation
                .run(
                    request,
                    &ticket.sys_id,
                    &ticket.number,
                    resolved_email.as_deref(),
                )
                .await
            {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    warn!(ticket_id = %ticket.sys_id, error = %e, "automation run failed");
                    None
                }
            },
            None => None,
        };

        let (classification, automation) = match outcome {
            Some(outcome) => (outcome.classification.clone(), Some(outcome)),
            None => {
                let classification = classify(
                    &self.rules,
                    &request.category,
                    &request.short_description,
                    &request.description,
                    non_empty(&request.error_code),
                );
                let note = compose_generic_note(&classification.topic, &classification.resources);
                // Annotation failure is degraded observability, never a
                // failed request.
                if let Err(e) = self.store.append_work_note(&ticket.sys_id, &note).await {
                    warn!(ticket_id = %ticket.sys_id, error = %e, "classification work note write failed");
                }
                (classification, None)
            }
        };

        Ok(IncidentResponse {
            ticket_id: ticket.sys_id,
            ticket_number: ticket.number,
            category: request.category.clone(),
            short_description: request.short_description.clone(),
            priority: priority.label().to_string(),
            topic: classification.topic,
            resources: classification.resources,
            automation,
        })
    }

    pub async fn list_incidents(
        &self,
        source: Option<&str>,
        state: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> GatewayResult<Vec<TicketRecord>> {
        let mut query = RecordQuery::new(TICKET_FIELDS)
            .page(limit.clamp(1, MAX_PAGE_SIZE), offset)
            .order_by_desc("sys_updated_on");

        if let Some(state) = state {
            if TicketState::from_code(state).is_none() {
                return Err(GatewayError::Validation(format!(
                    "unknown state code '{state}'"
                )));
            }
            query = query.filter_term(format!("state={state}"));
        }
        if let Some(source) = source {
            query = query.filter_term(format!("descriptionLIKE{CLIENT_MARKER}{source}"));
        }

        self.store.query_tickets(query).await
    }

    pub async fn stats(&self) -> GatewayResult<StatsSummary> {
        let query = RecordQuery::new(&["sys_id", "state"])
            .page(MAX_PAGE_SIZE * 5, 0)
            .order_by_desc("sys_updated_on");
        let tickets = self.store.query_tickets(query).await?;

        let mut by_state: BTreeMap<String, u64> = BTreeMap::new();
        for ticket in &tickets {
            *by_state
                .entry(format!("{:?}", ticket.state))
                .or_insert(0) += 1;
        }
        Ok(StatsSummary {
            total: tickets.len() as u64,
            by_state,
        })
    }

    async fn create_ticket(
        &self,
        request: &IncidentRequest,
        priority: Priority,
        long_text: &str,
    ) -> GatewayResult<TicketRecord> {
        let mut fields = FieldMap::new();
        fields.insert(
            "short_description".to_string(),
            Value::String(request.short_description.clone()),
        );
        fields.insert(
            "description".to_string(),
            Value::String(long_text.to_string()),
        );
        fields.insert(
            "state".to_string(),
            Value::String(TicketState::New.as_code().to_string()),
        );
        fields.insert(
            "priority".to_string(),
            Value::String(priority.as_code().to_string()),
        );
        fields.insert(
            "category".to_string(),
            Value::String(request.category.clone()),
        );
        fields.insert(
            "caller_id".to_string(),
            Value::String(request.caller_id.clone()),
        );
        fields.insert(
            "caller_email".to_string(),
            Value::String(request.email.clone()),
        );

        let ticket = self.store.create_ticket(&fields).await?;
        if ticket.sys_id.is_empty() {
            return Err(GatewayError::Internal(
                "remote create returned a record without an id".to_string(),
            ));
        }
        Ok(ticket)
    }
}

/// The long-text composite: free-text description, then the error-code and
/// client marker lines. Listing and activity queries later recover the
/// client name from this exact shape.
fn compose_long_text(request: &IncidentRequest) -> String {
    let mut text = request.description.trim_end().to_string();
    if let Some(code) = non_empty(&request.error_code) {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(ERROR_CODE_MARKER);
        text.push_str(code);
    }
    if let Some(source) = non_empty(&request.source) {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(CLIENT_MARKER);
        text.push_str(source);
    }
    text
}

fn compose_generic_note(topic: &str, resources: &[String]) -> String {
    let mut note = format!("{AUTOMATION_MARKER}Classified as '{topic}'");
    if !resources.is_empty() {
        note.push_str("\nRecommended resources:");
        for resource in resources {
            note.push_str("\n- ");
            note.push_str(resource);
        }
    }
    note
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
