use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Header attached to every response by the compliance decorator.
pub const COMPLIANCE_HEADER: &str = "x-compliance-notice";
pub const COMPLIANCE_NOTICE: &str =
    "Processed by the ticket gateway; ticket data is retained only in the remote platform of record";

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request handled"
    );
    response
}

/// Pure response decorator: adds the compliance banner header. Applied
/// uniformly at the HTTP boundary instead of intercepting serialization.
pub fn apply_compliance_banner(headers: &mut HeaderMap) {
    headers.insert(
        HeaderName::from_static(COMPLIANCE_HEADER),
        HeaderValue::from_static(COMPLIANCE_NOTICE),
    );
}

pub async fn compliance_banner(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply_compliance_banner(response.headers_mut());
    response
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

pub fn trace_layer(
) -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}
