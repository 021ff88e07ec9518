use async_trait::async_trait;
use serde_json::Value;

use ticketgate_core::{FieldMap, GatewayResult, TicketRecord};
use ticketgate_remote::{RecordQuery, TableClient};

/// The ticket fields this system reads; every remote query selects exactly
/// these, never "all fields".
pub const TICKET_FIELDS: &[&str] = &[
    "sys_id",
    "number",
    "short_description",
    "description",
    "state",
    "priority",
    "category",
    "caller_id",
    "caller_email",
    "work_notes",
    "sys_updated_on",
];

/// Port over the remote ticket table. The pipeline services depend on this
/// trait, not on the HTTP client, so tests can substitute recording doubles.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn create_ticket(&self, fields: &FieldMap) -> GatewayResult<TicketRecord>;

    /// Fetch by id, `None` when the id is unknown.
    async fn get_ticket(&self, sys_id: &str) -> GatewayResult<Option<TicketRecord>>;

    /// Partial update; only the supplied fields are transmitted.
    async fn update_ticket(&self, sys_id: &str, fields: &FieldMap) -> GatewayResult<TicketRecord>;

    /// Append one entry to the ticket's work-notes journal.
    async fn append_work_note(&self, sys_id: &str, note: &str) -> GatewayResult<()>;

    async fn query_tickets(&self, query: RecordQuery) -> GatewayResult<Vec<TicketRecord>>;
}

/// Production store over the resilient [`TableClient`].
pub struct RemoteTicketStore {
    client: TableClient,
    table: String,
}

impl RemoteTicketStore {
    pub fn new(client: TableClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl TicketStore for RemoteTicketStore {
    async fn create_ticket(&self, fields: &FieldMap) -> GatewayResult<TicketRecord> {
        let echoed = self
            .client
            .create(&self.table, fields, TICKET_FIELDS)
            .await?;
        Ok(TicketRecord::from_fields(&echoed))
    }

    async fn get_ticket(&self, sys_id: &str) -> GatewayResult<Option<TicketRecord>> {
        let query = RecordQuery::new(TICKET_FIELDS)
            .filter_term(format!("sys_id={sys_id}"))
            .page(1, 0);
        let rows = self.client.list(&self.table, &query).await?;
        Ok(rows.first().map(TicketRecord::from_fields))
    }

    async fn update_ticket(&self, sys_id: &str, fields: &FieldMap) -> GatewayResult<TicketRecord> {
        let echoed = self
            .client
            .update(&self.table, sys_id, fields, TICKET_FIELDS)
            .await?;
        Ok(TicketRecord::from_fields(&echoed))
    }

    async fn append_work_note(&self, sys_id: &str, note: &str) -> GatewayResult<()> {
        let mut fields = FieldMap::new();
        fields.insert("work_notes".to_string(), Value::String(note.to_string()));
        self.client
            .update(&self.table, sys_id, &fields, &["sys_id"])
            .await?;
        Ok(())
    }

    async fn query_tickets(&self, query: RecordQuery) -> GatewayResult<Vec<TicketRecord>> {
        let rows = self.client.list(&self.table, &query).await?;
        Ok(rows.iter().map(TicketRecord::from_fields).collect())
    }
}
