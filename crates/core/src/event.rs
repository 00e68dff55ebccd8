//! Event types: the ingest wire payload and the stored record.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::limits::MAX_METADATA_BYTES;

/// Caller-supplied timestamp: ISO-8601 string or epoch number.
///
/// Numeric values at or above 10^12 are read as epoch milliseconds
/// (what `Date.now()` emits), smaller values as epoch seconds.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum EventTimestamp {
    Iso(DateTime<Utc>),
    Epoch(i64),
}

/// Epoch values at or above this are milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

impl EventTimestamp {
    /// Resolve to UTC, or `None` for out-of-range epoch values.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Iso(dt) => Some(dt),
            Self::Epoch(n) if n.abs() >= EPOCH_MILLIS_THRESHOLD => {
                Utc.timestamp_millis_opt(n).single()
            }
            Self::Epoch(n) => Utc.timestamp_opt(n, 0).single(),
        }
    }
}

/// Validates metadata JSON size.
fn validate_metadata_size(metadata: &serde_json::Value) -> Result<(), ValidationError> {
    // Fast path: null/empty
    if metadata.is_null() {
        return Ok(());
    }

    let size = serde_json::to_vec(metadata).map(|v| v.len()).unwrap_or(0);

    if size > MAX_METADATA_BYTES {
        let mut err = ValidationError::new("metadata_too_large");
        err.message = Some(
            format!(
                "metadata {}KB exceeds {}KB limit",
                size / 1024,
                MAX_METADATA_BYTES / 1024
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Ingest request body (camelCase wire format).
///
/// `event_name` is optional at the serde layer so that its absence can
/// be reported as a missing-field error rather than a parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngestPayload {
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
    #[validate(length(max = 128))]
    pub user_id: Option<String>,
    #[validate(length(max = 128))]
    pub session_id: Option<String>,
    #[validate(length(max = 200))]
    pub event_name: Option<String>,
    #[validate(length(max = 2048))]
    pub url: Option<String>,
    #[validate(custom(function = "validate_metadata_size"))]
    pub metadata: Option<serde_json::Value>,
    pub timestamp: Option<EventTimestamp>,
}

impl IngestPayload {
    /// The trimmed event name, if present and non-empty.
    pub fn event_name(&self) -> Option<&str> {
        self.event_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A stored telemetry event. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID, generated at write time
    pub id: Uuid,
    /// Owning project
    pub project_id: String,
    /// Caller-asserted visitor identifier
    pub user_id: Option<String>,
    /// Caller-asserted session identifier
    pub session_id: Option<String>,
    /// Free-form event name
    pub event_name: String,
    /// Page URL at emission time
    pub url: Option<String>,
    /// Opaque key/value bag; defaults to an empty object
    pub metadata: serde_json::Value,
    /// Caller-supplied time, or ingestion time when absent
    pub timestamp: DateTime<Utc>,
    /// Server receive timestamp
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl Event {
    /// Build a stored event from an accepted payload.
    ///
    /// Applies the defaulting rules: generated id, `{}` metadata,
    /// `received_at` = now, `timestamp` = now when the caller supplied
    /// none (or an unrepresentable epoch value).
    pub fn from_payload(project_id: &str, event_name: &str, payload: IngestPayload) -> Self {
        let now = Utc::now();
        let timestamp = payload
            .timestamp
            .and_then(EventTimestamp::to_utc)
            .unwrap_or(now);
        Self {
            id: Uuid::new_v4(),
            project_id: project_id.to_string(),
            user_id: payload.user_id,
            session_id: payload.session_id,
            event_name: event_name.to_string(),
            url: payload.url,
            metadata: payload
                .metadata
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            timestamp,
            received_at: now,
        }
    }
}
