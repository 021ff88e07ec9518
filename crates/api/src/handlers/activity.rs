use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::response::success;
use crate::routes::AppState;

const DEFAULT_FEED_LIMIT: usize = 25;

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub limit: Option<usize>,
}

/// Reconstructed automation activity feed, newest first.
pub async fn list_activity(
    State(state): State<AppState>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_FEED_LIMIT);
    let entries = state.activity.list_activity(limit).await?;
    Ok(success(entries))
}
