//! HTTP surface of the ticket gateway.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod validation;

use std::future::Future;

use tracing::info;

use ticketgate_core::{GatewayError, GatewayResult};

pub use error::{ApiError, ApiResult};
pub use routes::{create_routes, AppState};

/// Bind and serve the API until the shutdown future resolves.
pub async fn serve(
    bind_address: &str,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> GatewayResult<()> {
    let router = create_routes(state);
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| GatewayError::Internal(format!("cannot bind {bind_address}: {e}")))?;

    info!(bind_address, "ticket gateway API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GatewayError::Internal(format!("server error: {e}")))
}
