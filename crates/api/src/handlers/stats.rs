use axum::extract::State;

use crate::error::ApiResult;
use crate::response::success;
use crate::routes::AppState;

/// Aggregate ticket counts by lifecycle state.
pub async fn get_stats(
    State(state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let summary = state.incidents.stats().await?;
    Ok(success(summary))
}
