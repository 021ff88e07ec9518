use axum::Json;
use serde_json::json;

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "ticketgate",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
