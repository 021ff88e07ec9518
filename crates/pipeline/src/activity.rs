use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;

use ticketgate_core::{ActivityEntry, GatewayResult, AUTOMATION_MARKER, CLIENT_MARKER};
use ticketgate_remote::RecordQuery;

use crate::store::{TicketStore, TICKET_FIELDS};

/// Tickets scanned per reconstruction pass.
const SCAN_PAGE_SIZE: u32 = 200;

fn client_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Client:\s*([^\n]+)").expect("static pattern"))
}

/// Read-only reconstruction of the automation activity feed from ticket
/// work notes. Nothing is stored; every call recomputes from the remote
/// journal.
pub struct ActivityService {
    store: Arc<dyn TicketStore>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Scan tickets carrying the automation marker and a client marker,
    /// expand each marked work-note line into one entry, newest first.
    pub async fn list_activity(&self, limit: usize) -> GatewayResult<Vec<ActivityEntry>> {
        let query = RecordQuery::new(TICKET_FIELDS)
            .filter_term(format!("work_notesLIKE{}", AUTOMATION_MARKER.trim_end()))
            .filter_term(format!("descriptionLIKE{}", CLIENT_MARKER.trim_end()))
            .page(SCAN_PAGE_SIZE, 0)
            .order_by_desc("sys_updated_on");

        let tickets = self.store.query_tickets(query).await?;

        let mut entries: Vec<ActivityEntry> = Vec::new();
        for ticket in &tickets {
            let client = extract_client(&ticket.description);
            for line in ticket.work_notes.lines() {
                if let Some(summary) = line.strip_prefix(AUTOMATION_MARKER) {
                    entries.push(ActivityEntry {
                        timestamp: ticket.updated_on,
                        ticket_number: ticket.number.clone(),
                        client: client.clone(),
                        summary: summary.trim().to_string(),
                        ticket_id: ticket.sys_id.clone(),
                    });
                }
            }
        }

        // Stable sort: entries of one ticket share its timestamp, so log
        // order within a ticket survives the reordering.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Recover the client name from the long-text composite.
pub fn extract_client(description: &str) -> Option<String> {
    client_pattern()
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
