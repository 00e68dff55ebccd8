//! Project key types and credential extraction.
//!
//! Every project owns a credential pair: a public key safe to embed in
//! third-party pages (read-only identification) and a secret key for
//! server-to-server calls. Keys are opaque strings looked up by exact
//! match; there is deliberately no format validation step so that a
//! malformed key and an unknown key are indistinguishable to callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for public (browser-embeddable) keys.
pub const PUBLIC_KEY_PREFIX: &str = "pk_";

/// Prefix for secret (server-to-server) keys.
pub const SECRET_KEY_PREFIX: &str = "sk_";

/// A project's issued credential pair. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public_key: String,
    pub secret_key: String,
}

impl KeyPair {
    /// Generate a fresh credential pair.
    pub fn generate() -> Self {
        Self {
            public_key: format!("{}{}", PUBLIC_KEY_PREFIX, Uuid::new_v4().simple()),
            secret_key: format!("{}{}", SECRET_KEY_PREFIX, Uuid::new_v4().simple()),
        }
    }
}

/// Credentials supplied with an ingestion request.
///
/// The secret key may arrive as an `Authorization: Bearer` header or a
/// body field; the header wins when both are present. Secret-key
/// presence takes priority over the public key during resolution.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub secret_key: Option<String>,
    pub public_key: Option<String>,
}

impl Credentials {
    /// Assemble credentials from the header bearer token and body fields.
    pub fn from_parts(
        bearer: Option<&str>,
        body_secret: Option<&str>,
        body_public: Option<&str>,
    ) -> Self {
        let secret_key = bearer
            .or(body_secret)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let public_key = body_public
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            secret_key,
            public_key,
        }
    }

    /// True when neither key was supplied.
    pub fn is_empty(&self) -> bool {
        self.secret_key.is_none() && self.public_key.is_none()
    }
}

/// Extract a bearer token from an `Authorization` header value.
pub fn extract_bearer(auth_header: Option<&str>) -> Option<&str> {
    auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
