use thiserror::Error;

/// Gateway error taxonomy.
///
/// Remote failures are split into a status-carrying variant (retry
/// eligibility is decided from the status code) and a transport variant
/// (always terminal). `RetryExhausted` wraps the last remote error once the
/// retry ceiling is hit.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("remote API returned HTTP {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        last: Box<GatewayError>,
    },

    #[error("ticket not found: {id}")]
    TicketNotFound { id: String },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("notification error: {0}")]
    Notification(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Whether the failure is transient and eligible for backoff retry.
    /// Only rate limiting (429) and server errors (5xx) qualify; every
    /// other status and all transport errors are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::RemoteStatus { status, .. } => {
                *status == 429 || (500..=599).contains(status)
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

/// Unified result type for the gateway crates.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
