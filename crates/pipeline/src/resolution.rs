use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use ticketgate_core::{
    FieldMap, GatewayError, GatewayResult, ResolutionConfig, ResolvedTicket, TicketState,
};

use crate::store::TicketStore;

/// Idempotent transition of a ticket into the terminal resolved state.
pub struct ResolutionService {
    store: Arc<dyn TicketStore>,
    config: ResolutionConfig,
}

impl ResolutionService {
    pub fn new(store: Arc<dyn TicketStore>, config: ResolutionConfig) -> Self {
        Self { store, config }
    }

    /// Fetch-first guard: a ticket already in a terminal state is returned
    /// unchanged with `already_resolved` set, and no update is issued.
    /// Otherwise a partial update sets the terminal state, the configured
    /// close code and the caller's note (or the configured default).
    pub async fn resolve_ticket(
        &self,
        ticket_id: &str,
        note: Option<&str>,
    ) -> GatewayResult<ResolvedTicket> {
        let ticket = self
            .store
            .get_ticket(ticket_id)
            .await?
            .ok_or_else(|| GatewayError::TicketNotFound {
                id: ticket_id.to_string(),
            })?;

        if ticket.state.is_terminal() {
            info!(ticket_id, state = ?ticket.state, "ticket already in a terminal state");
            return Ok(ResolvedTicket {
                ticket,
                already_resolved: true,
            });
        }

        let close_notes = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.config.default_note);

        let mut fields = FieldMap::new();
        fields.insert(
            "state".to_string(),
            Value::String(TicketState::Resolved.as_code().to_string()),
        );
        fields.insert(
            "close_code".to_string(),
            Value::String(self.config.close_code.clone()),
        );
        fields.insert(
            "close_notes".to_string(),
            Value::String(close_notes.to_string()),
        );

        let mut updated = self.store.update_ticket(ticket_id, &fields).await?;
        // The remote echo can lag the write; the response always reports
        // the state we just set.
        updated.state = TicketState::Resolved;

        info!(ticket_id, number = %updated.number, "ticket resolved");
        Ok(ResolvedTicket {
            ticket: updated,
            already_resolved: false,
        })
    }
}
