use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use ticketgate_core::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_type, suggestions) = match &self {
            ApiError::Gateway(GatewayError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                format!("request rejected: {msg}"),
                "VALIDATION_ERROR".to_string(),
                vec![
                    "Check the request payload against the intake form contract".to_string(),
                ],
            ),
            ApiError::Gateway(GatewayError::TicketNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("ticket {id} does not exist"),
                "TICKET_NOT_FOUND".to_string(),
                vec![
                    "Check the ticket id".to_string(),
                    "Use GET /incidents to list known tickets".to_string(),
                ],
            ),
            ApiError::Gateway(GatewayError::RetryExhausted { attempts, last }) => (
                StatusCode::BAD_GATEWAY,
                format!("remote platform unavailable after {attempts} attempts: {last}"),
                "REMOTE_UNAVAILABLE".to_string(),
                vec!["Retry later; the remote ticketing platform is degraded".to_string()],
            ),
            ApiError::Gateway(GatewayError::RemoteStatus { status, body }) => (
                StatusCode::BAD_GATEWAY,
                format!("remote platform rejected the request (HTTP {status}): {body}"),
                "REMOTE_REJECTED".to_string(),
                vec!["Check the gateway's remote credentials and field mapping".to_string()],
            ),
            ApiError::Gateway(GatewayError::Transport(msg)) => (
                StatusCode::BAD_GATEWAY,
                format!("cannot reach the remote platform: {msg}"),
                "REMOTE_UNREACHABLE".to_string(),
                vec!["Check network connectivity to the remote instance".to_string()],
            ),
            ApiError::Gateway(GatewayError::Configuration(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("gateway misconfiguration: {msg}"),
                "CONFIGURATION_ERROR".to_string(),
                vec!["Review the gateway configuration file".to_string()],
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                format!("request rejected: {msg}"),
                "BAD_REQUEST".to_string(),
                vec![
                    "Check the request payload against the intake form contract".to_string(),
                ],
            ),
            ApiError::Gateway(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal gateway error".to_string(),
                "INTERNAL_ERROR".to_string(),
                vec!["Retry later; contact the operator if the problem persists".to_string()],
            ),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "suggestions": suggestions,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
