//! In-memory doubles for the pipeline services: a recording ticket store,
//! failing variants for degradation paths, and a recording mailer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use ticketgate_core::{FieldMap, GatewayError, GatewayResult, TicketRecord};
use ticketgate_remote::RecordQuery;

use crate::notify::Mailer;
use crate::store::TicketStore;

const REMOTE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Recording in-memory ticket store.
#[derive(Default)]
pub struct MockTicketStore {
    tickets: Mutex<Vec<FieldMap>>,
    queries: Mutex<Vec<RecordQuery>>,
    updates: Mutex<Vec<FieldMap>>,
    create_calls: Mutex<u32>,
    next_number: Mutex<u32>,
    fail_work_notes: AtomicBool,
    stale_update_echo: AtomicBool,
}

impl MockTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_work_notes(&self) {
        self.fail_work_notes.store(true, Ordering::SeqCst);
    }

    /// Make update echoes return the pre-update record, emulating a remote
    /// whose read replica lags the write.
    pub fn set_stale_update_echo(&self, stale: bool) {
        self.stale_update_echo.store(stale, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> u32 {
        *self.create_calls.lock().unwrap()
    }

    pub fn update_calls(&self) -> u32 {
        self.updates.lock().unwrap().len() as u32
    }

    pub fn last_update_fields(&self) -> Option<FieldMap> {
        self.updates.lock().unwrap().last().cloned()
    }

    pub fn recorded_queries(&self) -> Vec<RecordQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn get(&self, sys_id: &str) -> Option<TicketRecord> {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .find(|f| field_str(f, "sys_id") == sys_id)
            .map(TicketRecord::from_fields)
    }

    pub fn notes_for(&self, sys_id: &str) -> Vec<String> {
        self.get(sys_id)
            .map(|t| {
                if t.work_notes.is_empty() {
                    Vec::new()
                } else {
                    vec![t.work_notes]
                }
            })
            .unwrap_or_default()
    }

    /// Seed a minimal ticket in the given state, returning its id.
    pub fn seed_ticket(&self, state_code: &str) -> String {
        let sys_id = Uuid::new_v4().simple().to_string();
        let mut fields = FieldMap::new();
        fields.insert("sys_id".to_string(), Value::String(sys_id.clone()));
        fields.insert(
            "number".to_string(),
            Value::String(self.next_number()),
        );
        fields.insert("state".to_string(), Value::String(state_code.to_string()));
        fields.insert(
            "sys_updated_on".to_string(),
            Value::String(Utc::now().format(REMOTE_TIME_FORMAT).to_string()),
        );
        self.tickets.lock().unwrap().push(fields);
        sys_id
    }

    /// Seed a ticket with full journal content for reconstruction tests.
    pub fn seed_ticket_full(
        &self,
        number: &str,
        description: &str,
        work_notes: &str,
        updated: DateTime<Utc>,
    ) -> String {
        let sys_id = Uuid::new_v4().simple().to_string();
        let mut fields = FieldMap::new();
        fields.insert("sys_id".to_string(), Value::String(sys_id.clone()));
        fields.insert("number".to_string(), Value::String(number.to_string()));
        fields.insert(
            "description".to_string(),
            Value::String(description.to_string()),
        );
        fields.insert(
            "work_notes".to_string(),
            Value::String(work_notes.to_string()),
        );
        fields.insert("state".to_string(), Value::String("1".to_string()));
        fields.insert(
            "sys_updated_on".to_string(),
            Value::String(updated.format(REMOTE_TIME_FORMAT).to_string()),
        );
        self.tickets.lock().unwrap().push(fields);
        sys_id
    }

    fn next_number(&self) -> String {
        let mut next = self.next_number.lock().unwrap();
        *next += 1;
        format!("INC00100{:02}", *next)
    }
}

#[async_trait]
impl TicketStore for MockTicketStore {
    async fn create_ticket(&self, fields: &FieldMap) -> GatewayResult<TicketRecord> {
        *self.create_calls.lock().unwrap() += 1;
        let mut stored = fields.clone();
        stored.insert(
            "sys_id".to_string(),
            Value::String(Uuid::new_v4().simple().to_string()),
        );
        stored.insert("number".to_string(), Value::String(self.next_number()));
        stored.insert(
            "sys_updated_on".to_string(),
            Value::String(Utc::now().format(REMOTE_TIME_FORMAT).to_string()),
        );
        let record = TicketRecord::from_fields(&stored);
        self.tickets.lock().unwrap().push(stored);
        Ok(record)
    }

    async fn get_ticket(&self, sys_id: &str) -> GatewayResult<Option<TicketRecord>> {
        Ok(self.get(sys_id))
    }

    async fn update_ticket(&self, sys_id: &str, fields: &FieldMap) -> GatewayResult<TicketRecord> {
        self.updates.lock().unwrap().push(fields.clone());
        let mut tickets = self.tickets.lock().unwrap();
        let stored = tickets
            .iter_mut()
            .find(|f| field_str(f, "sys_id") == sys_id)
            .ok_or_else(|| GatewayError::RemoteStatus {
                status: 404,
                body: format!("no record {sys_id}"),
            })?;
        let before = TicketRecord::from_fields(stored);
        for (key, value) in fields {
            stored.insert(key.clone(), value.clone());
        }
        if self.stale_update_echo.load(Ordering::SeqCst) {
            Ok(before)
        } else {
            Ok(TicketRecord::from_fields(stored))
        }
    }

    async fn append_work_note(&self, sys_id: &str, note: &str) -> GatewayResult<()> {
        if self.fail_work_notes.load(Ordering::SeqCst) {
            return Err(GatewayError::RemoteStatus {
                status: 500,
                body: "journal write rejected".to_string(),
            });
        }
        let mut tickets = self.tickets.lock().unwrap();
        let stored = tickets
            .iter_mut()
            .find(|f| field_str(f, "sys_id") == sys_id)
            .ok_or_else(|| GatewayError::RemoteStatus {
                status: 404,
                body: format!("no record {sys_id}"),
            })?;
        let mut notes = field_str(stored, "work_notes");
        if !notes.is_empty() {
            notes.push('\n');
        }
        notes.push_str(note);
        stored.insert("work_notes".to_string(), Value::String(notes));
        Ok(())
    }

    async fn query_tickets(&self, query: RecordQuery) -> GatewayResult<Vec<TicketRecord>> {
        self.queries.lock().unwrap().push(query);
        let mut records: Vec<TicketRecord> = self
            .tickets
            .lock()
            .unwrap()
            .iter()
            .map(TicketRecord::from_fields)
            .collect();
        records.sort_by(|a, b| b.updated_on.cmp(&a.updated_on));
        Ok(records)
    }
}

fn field_str(fields: &FieldMap, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Every operation fails with a retry-exhausted-style server error.
#[derive(Default)]
pub struct FailingStore;

impl FailingStore {
    pub fn new() -> Self {
        Self
    }

    fn err<T>() -> GatewayResult<T> {
        Err(GatewayError::RemoteStatus {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

#[async_trait]
impl TicketStore for FailingStore {
    async fn create_ticket(&self, _fields: &FieldMap) -> GatewayResult<TicketRecord> {
        Self::err()
    }

    async fn get_ticket(&self, _sys_id: &str) -> GatewayResult<Option<TicketRecord>> {
        Self::err()
    }

    async fn update_ticket(
        &self,
        _sys_id: &str,
        _fields: &FieldMap,
    ) -> GatewayResult<TicketRecord> {
        Self::err()
    }

    async fn append_work_note(&self, _sys_id: &str, _note: &str) -> GatewayResult<()> {
        Self::err()
    }

    async fn query_tickets(&self, _query: RecordQuery) -> GatewayResult<Vec<TicketRecord>> {
        Self::err()
    }
}

/// Creates succeed, journal writes fail. Exercises the annotation
/// degradation path.
pub struct FailingNoteStore {
    inner: MockTicketStore,
}

impl FailingNoteStore {
    pub fn new() -> Self {
        let inner = MockTicketStore::new();
        inner.fail_work_notes();
        Self { inner }
    }
}

impl Default for FailingNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for FailingNoteStore {
    async fn create_ticket(&self, fields: &FieldMap) -> GatewayResult<TicketRecord> {
        self.inner.create_ticket(fields).await
    }

    async fn get_ticket(&self, sys_id: &str) -> GatewayResult<Option<TicketRecord>> {
        self.inner.get_ticket(sys_id).await
    }

    async fn update_ticket(&self, sys_id: &str, fields: &FieldMap) -> GatewayResult<TicketRecord> {
        self.inner.update_ticket(sys_id, fields).await
    }

    async fn append_work_note(&self, sys_id: &str, note: &str) -> GatewayResult<()> {
        self.inner.append_work_note(sys_id, note).await
    }

    async fn query_tickets(&self, query: RecordQuery) -> GatewayResult<Vec<TicketRecord>> {
        self.inner.query_tickets(query).await
    }
}

/// Mailer double with a scripted outcome and a sent log.
pub struct RecordingMailer {
    outcome: bool,
    sent: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn new(outcome: bool) -> Self {
        Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_ack(&self, to: &str, _ticket_number: &str, _topic: &str) -> GatewayResult<bool> {
        self.sent.lock().unwrap().push(to.to_string());
        Ok(self.outcome)
    }

    fn provider(&self) -> Option<String> {
        Some("recording-mailer".to_string())
    }
}
