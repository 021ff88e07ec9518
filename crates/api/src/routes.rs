use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use ticketgate_pipeline::{ActivityService, IncidentService, ResolutionService};

use crate::handlers::{
    activity::list_activity,
    health::health_check,
    incidents::{create_incident, list_incidents, resolve_incident},
    stats::get_stats,
};
use crate::middleware::{compliance_banner, cors_layer, request_logging, trace_layer};

#[derive(Clone)]
pub struct AppState {
    pub incidents: Arc<IncidentService>,
    pub resolution: Arc<ResolutionService>,
    pub activity: Arc<ActivityService>,
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/incident", post(create_incident))
        .route("/incidents", get(list_incidents))
        .route("/incident/{id}/resolve", post(resolve_incident))
        .route("/automation-activity", get(list_activity))
        .route("/stats", get(get_stats))
        .layer(middleware::from_fn(request_logging))
        .layer(middleware::from_fn(compliance_banner))
        .layer(cors_layer())
        .layer(trace_layer())
        .with_state(state)
}
