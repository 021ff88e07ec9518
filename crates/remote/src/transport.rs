use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use ticketgate_core::{GatewayError, GatewayResult, RemoteConfig};

/// Header carrying the gateway's client identification on every outbound
/// request.
pub const CLIENT_HEADER_NAME: &str = "X-Gateway-Client";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// One outbound request, fully described before it hits the wire so the
/// retry wrapper can replay it verbatim.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response before success/retry classification.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// Executes one request against the remote platform. Transport failures
/// (connect, DNS, timeout) surface as `GatewayError::Transport` and are
/// terminal; HTTP statuses come back in the response untouched so the
/// caller owns the retry decision.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> GatewayResult<ApiResponse>;
}

/// Production transport over `reqwest` with basic auth and the explicit
/// client-identification header.
pub struct HttpTransport {
    base_url: String,
    username: String,
    password: String,
    client_header: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client_header: config.client_header.clone(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ApiRequest) -> GatewayResult<ApiResponse> {
        let url = format!("{}/{}", self.base_url, request.path);

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Patch => self.http.patch(&url),
            Method::Delete => self.http.delete(&url),
        };

        builder = builder
            .basic_auth(&self.username, Some(&self.password))
            .header(CLIENT_HEADER_NAME, &self.client_header)
            .query(&request.query);

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        debug!(url, status, "remote call completed");

        // DELETE returns an empty 204 body; error bodies may be plain text.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}
