//! Ingestion endpoint handler.
//!
//! One event per request, authenticated by project key. The
//! processing order is fixed: rate limit, size check, parse, bot
//! flag, key resolution, event name check, persist. Each step
//! short-circuits on failure; the rate limit bucket mutates on every
//! request regardless of outcome.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use pulse_core::limits::{BOT_UA_PATTERN, MAX_INGEST_BODY_BYTES};
use pulse_core::{extract_bearer, Credentials, Event, IngestPayload};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::extractors::ClientIp;
use crate::middleware::rate_limit::Decision;
use crate::response::{ApiError, IngestResponse};
use crate::state::AppState;

/// Compiled bot user-agent heuristic (lazy initialization).
static BOT_UA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BOT_UA_PATTERN).expect("invalid bot UA pattern"));

/// POST /ingest - single-event ingestion endpoint.
pub async fn ingest_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestResponse>, ApiError> {
    let start = Instant::now();

    // Rate limit first: abusive callers are cut off before any work.
    if let Decision::Throttled { retry_after_secs } = state.rate_limiter.admit(&client_ip) {
        warn!(client_ip = %client_ip, "Rate limit exceeded");
        return Err(ApiError::rate_limited(
            "Rate limit exceeded",
            Some(retry_after_secs),
        ));
    }

    // Declared size before the body is parsed.
    let declared_len = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(body.len());
    if declared_len.max(body.len()) > MAX_INGEST_BODY_BYTES {
        return Err(ApiError::payload_too_large(format!(
            "Payload size {}KB exceeds {}KB limit",
            declared_len.max(body.len()) / 1024,
            MAX_INGEST_BODY_BYTES / 1024
        )));
    }

    let payload: IngestPayload = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "Failed to parse ingest payload");
        ApiError::bad_request(e.to_string())
    })?;

    payload.validate().map_err(|e| {
        debug!(error = %e, "Ingest payload failed validation");
        ApiError::validation(
            "VALID_001",
            e.to_string().lines().map(str::to_string).collect(),
        )
    })?;

    // Bot-like callers are flagged for later analysis, never blocked.
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    if let Some(ua) = user_agent {
        if BOT_UA_REGEX.is_match(ua) {
            info!(client_ip = %client_ip, user_agent = %ua, "Bot-like user agent");
        }
    }

    let bearer = extract_bearer(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    );
    let credentials = Credentials::from_parts(
        bearer,
        payload.secret_key.as_deref(),
        payload.public_key.as_deref(),
    );
    let project_id = state.registry.resolve_project(&credentials).await?;

    let event_name = payload
        .event_name()
        .ok_or_else(ApiError::missing_event_name)?
        .to_string();

    let event = Event::from_payload(&project_id, &event_name, payload);
    let event_id = event.id;

    state.store.append(event).await.map_err(|e| {
        error!(project_id = %project_id, error = %e, "Failed to store event");
        ApiError::internal("Failed to store event")
    })?;

    info!(
        project_id = %project_id,
        event_id = %event_id,
        event_name = %event_name,
        latency_ms = start.elapsed().as_millis() as u64,
        "Event stored"
    );

    Ok(Json(IngestResponse::success(event_id)))
}

/// OPTIONS /ingest - CORS preflight, answered without authentication.
pub async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Authorization",
            ),
        ],
    )
}
