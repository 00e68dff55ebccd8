//! Test fixtures and payload generators.

use chrono::{Duration, Utc};
use pulse_core::Event;
use uuid::Uuid;

/// Project seeded into every test context.
pub const PROJECT_ID: &str = "proj-test";

/// Public key registered for [`PROJECT_ID`].
pub const PUBLIC_KEY: &str = "pk_test0123456789abcdef0123456789ab";

/// Secret key registered for [`PROJECT_ID`].
pub const SECRET_KEY: &str = "sk_test0123456789abcdef0123456789ab";

/// A full, valid ingest payload authenticated with the public key.
pub fn page_view_payload() -> serde_json::Value {
    serde_json::json!({
        "publicKey": PUBLIC_KEY,
        "userId": Uuid::new_v4().to_string(),
        "sessionId": Uuid::new_v4().to_string(),
        "eventName": "page_view",
        "url": "https://example.com/pricing",
        "metadata": { "referrer": "https://news.ycombinator.com" },
        "timestamp": Utc::now().to_rfc3339()
    })
}

/// Payload with a specific event name, public-key authenticated.
pub fn payload_named(event_name: &str) -> serde_json::Value {
    let mut payload = page_view_payload();
    payload["eventName"] = serde_json::Value::String(event_name.to_string());
    payload
}

/// The smallest accepted payload: a key and an event name.
pub fn minimal_payload() -> serde_json::Value {
    serde_json::json!({
        "publicKey": PUBLIC_KEY,
        "eventName": "page_view"
    })
}

/// Valid shape but no credentials anywhere.
pub fn payload_without_keys() -> serde_json::Value {
    serde_json::json!({
        "eventName": "page_view"
    })
}

/// Valid credentials but no event name.
pub fn payload_without_event_name() -> serde_json::Value {
    serde_json::json!({
        "publicKey": PUBLIC_KEY,
        "userId": Uuid::new_v4().to_string()
    })
}

/// A payload whose serialized size exceeds the 50KB ingest limit.
pub fn oversized_payload() -> String {
    serde_json::json!({
        "publicKey": PUBLIC_KEY,
        "eventName": "bulk_import",
        "metadata": { "blob": "x".repeat(60 * 1024) }
    })
    .to_string()
}

/// A stored event for seeding the metrics engine directly.
pub fn stored_event(
    user_id: Option<&str>,
    session_id: Option<&str>,
    event_name: &str,
    minutes_ago: i64,
) -> Event {
    let timestamp = Utc::now() - Duration::minutes(minutes_ago);
    Event {
        id: Uuid::new_v4(),
        project_id: PROJECT_ID.to_string(),
        user_id: user_id.map(str::to_string),
        session_id: session_id.map(str::to_string),
        event_name: event_name.to_string(),
        url: None,
        metadata: serde_json::json!({}),
        timestamp,
        received_at: timestamp,
    }
}
