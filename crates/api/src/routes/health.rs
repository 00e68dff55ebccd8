//! Liveness probe.

use axum::Json;

use crate::response::HealthResponse;

/// GET /health - process liveness.
///
/// The event store is in-process, so there are no dependency checks
/// to report; a response at all means the gateway is serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
