//! API routes.

pub mod health;
pub mod ingest;
pub mod tracker;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
///
/// The tracker runs on arbitrary third-party origins, so every
/// response carries a wildcard allow-origin header; preflights get a
/// dedicated 204 handler instead of a CORS layer so the header set
/// stays exact.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/ingest",
            post(ingest::ingest_handler).options(ingest::preflight_handler),
        )
        .route("/tracker.js", get(tracker::tracker_handler))
        .route("/health", get(health::health_handler))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
