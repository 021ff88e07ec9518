use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Uniform success envelope for every API payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

/// Offset-paged listing payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub limit: u32,
    pub offset: u32,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, limit: u32, offset: u32) -> Self {
        let count = items.len();
        Self {
            items,
            count,
            limit,
            offset,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, ApiResponse::success(data))
}

pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialization() {
        let response = ApiResponse::success("payload");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"payload\""));
        assert!(json.contains("\"timestamp\""));
    }

    #[test]
    fn test_offset_page_counts_items() {
        let page = OffsetPage::new(vec!["a", "b", "c"], 10, 20);
        assert_eq!(page.count, 3);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 20);
    }
}
