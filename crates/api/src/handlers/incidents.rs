use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use ticketgate_core::IncidentRequest;

use crate::error::ApiResult;
use crate::response::{created, success, OffsetPage};
use crate::routes::AppState;
use crate::validation::validate_incident_request;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub source: Option<String>,
    pub state: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveBody {
    pub note: Option<String>,
}

/// Create a ticket on the remote platform and enrich the response with the
/// local classification.
pub async fn create_incident(
    State(state): State<AppState>,
    Json(request): Json<IncidentRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    validate_incident_request(&request)?;
    let response = state.incidents.create_incident(&request).await?;
    Ok(created(response))
}

pub async fn list_incidents(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let limit = params.limit.unwrap_or(20);
    let offset = params.offset.unwrap_or(0);
    let tickets = state
        .incidents
        .list_incidents(
            params.source.as_deref(),
            params.state.as_deref(),
            limit,
            offset,
        )
        .await?;
    Ok(success(OffsetPage::new(tickets, limit, offset)))
}

/// Idempotent resolve: a second call on the same ticket reports
/// `already_resolved` and performs no further remote update.
pub async fn resolve_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ResolveBody>>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let note = body.and_then(|Json(b)| b.note);
    let resolved = state.resolution.resolve_ticket(&id, note.as_deref()).await?;
    Ok(success(resolved))
}
