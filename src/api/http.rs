//! HTTP server setup with Axum

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use super::rest::{analytics, events, tours};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - the dashboard may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/tours", get(tours::list_tours).post(tours::create_tour))
        .route("/api/tours/:id", delete(tours::delete_tour))
        .route("/api/events", post(events::record_event))
        .route("/api/events/stats", get(events::event_stats))
        .route("/api/analytics/tour-stats", get(analytics::tour_stats))
        .route("/api/analytics/step-analytics", get(analytics::step_analytics))
        .route("/api/analytics/completion-trend", get(analytics::completion_trend))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on `addr` until `shutdown` is cancelled
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Tour analytics API listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
