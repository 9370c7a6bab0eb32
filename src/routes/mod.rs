pub mod error;
pub mod health;
pub mod metrics;
pub mod submissions;
pub mod verify;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Headroom above the image limit for multipart boundaries and text fields.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Build the HTTP API.
pub fn router(state: AppState, prometheus: Arc<PrometheusHandle>) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/verifications", post(verify::submit_verification))
        .route(
            "/api/v1/verifications/{session_id}",
            delete(verify::clear_session),
        )
        .route(
            "/api/v1/verifications/{session_id}/{form}",
            get(verify::get_latest),
        )
        .route(
            "/api/v1/submissions/check",
            post(submissions::check_submission),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(prometheus),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(body_limit))
}
