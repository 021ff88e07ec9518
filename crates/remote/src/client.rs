use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use ticketgate_core::{FieldMap, GatewayError, GatewayResult, RetryPolicy};

use crate::query::RecordQuery;
use crate::transport::{ApiRequest, Method, Transport};

/// Record-level client for the remote table API. All four operations route
/// through [`TableClient::call`], the single retry wrapper.
#[derive(Clone)]
pub struct TableClient {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl TableClient {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub async fn list(&self, table: &str, query: &RecordQuery) -> GatewayResult<Vec<FieldMap>> {
        let request = ApiRequest::new(Method::Get, table).with_query(query.to_params());
        let result = unwrap_result(self.call(request).await?)?;
        let rows = result.as_array().ok_or_else(|| {
            GatewayError::Serialization("list response result is not an array".to_string())
        })?;
        rows.iter()
            .map(|row| {
                row.as_object().cloned().ok_or_else(|| {
                    GatewayError::Serialization("list row is not an object".to_string())
                })
            })
            .collect()
    }

    pub async fn create(
        &self,
        table: &str,
        fields: &FieldMap,
        return_fields: &[&str],
    ) -> GatewayResult<FieldMap> {
        let request = ApiRequest::new(Method::Post, table)
            .with_query(echo_fields(return_fields))
            .with_body(Value::Object(fields.clone()));
        into_record(unwrap_result(self.call(request).await?)?)
    }

    /// Partial update: only the changed fields are transmitted, never a
    /// full-record replace.
    pub async fn update(
        &self,
        table: &str,
        sys_id: &str,
        fields: &FieldMap,
        return_fields: &[&str],
    ) -> GatewayResult<FieldMap> {
        let request = ApiRequest::new(Method::Patch, format!("{table}/{sys_id}"))
            .with_query(echo_fields(return_fields))
            .with_body(Value::Object(fields.clone()));
        into_record(unwrap_result(self.call(request).await?)?)
    }

    pub async fn delete(&self, table: &str, sys_id: &str) -> GatewayResult<()> {
        let request = ApiRequest::new(Method::Delete, format!("{table}/{sys_id}"));
        self.call(request).await.map(|_| ())
    }

    /// The retry wrapper. Every response classifies into exactly one of
    /// success, retryable (429/5xx) or terminal. Retryable outcomes back
    /// off exponentially with signed jitter until `max_attempts` calls have
    /// been made; the ceiling is hard.
    async fn call(&self, request: ApiRequest) -> GatewayResult<Value> {
        let mut attempt: u32 = 1;
        loop {
            let response = self.transport.execute(&request).await?;

            if (200..300).contains(&response.status) {
                return Ok(response.body);
            }

            let err = GatewayError::RemoteStatus {
                status: response.status,
                body: body_snippet(&response.body),
            };

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= self.retry.max_attempts {
                warn!(
                    path = %request.path,
                    attempts = attempt,
                    "remote call failed after exhausting retries"
                );
                return Err(GatewayError::RetryExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            let delay = self.backoff_delay(attempt);
            debug!(
                path = %request.path,
                status = response.status,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "retryable remote failure, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// `base * multiplier^(attempt-1)` plus signed jitter of up to the
    /// configured fraction of that value.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.retry.base_delay_ms as f64;
        let raw = base * self.retry.multiplier.powi(attempt.saturating_sub(1) as i32);
        let jitter = raw * self.retry.jitter * (rand::random::<f64>() * 2.0 - 1.0);
        Duration::from_millis((raw + jitter).max(0.0) as u64)
    }
}

fn echo_fields(return_fields: &[&str]) -> Vec<(String, String)> {
    vec![("sysparm_fields".to_string(), return_fields.join(","))]
}

/// The platform wraps every payload as `{"result": ...}`.
fn unwrap_result(body: Value) -> GatewayResult<Value> {
    match body {
        Value::Object(mut map) => map.remove("result").ok_or_else(|| {
            GatewayError::Serialization("response has no 'result' envelope".to_string())
        }),
        other => Err(GatewayError::Serialization(format!(
            "unexpected response shape: {other}"
        ))),
    }
}

fn into_record(result: Value) -> GatewayResult<FieldMap> {
    match result {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Serialization(format!(
            "record result is not an object: {other}"
        ))),
    }
}

fn body_snippet(body: &Value) -> String {
    let text = match body {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    text.chars().take(200).collect()
}
