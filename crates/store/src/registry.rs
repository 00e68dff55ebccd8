//! Project key registry: credential to project resolution.

use pulse_core::error::AuthErrorCode;
use pulse_core::{Credentials, Error, Result};
use std::sync::Arc;
use tracing::debug;

use crate::EventStore;

/// Read-only lookup of project credentials against the store's
/// project table. No side effects.
#[derive(Clone)]
pub struct KeyRegistry {
    store: Arc<dyn EventStore>,
}

impl KeyRegistry {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Resolve credentials to a project id.
    ///
    /// A supplied secret key is tried first; a supplied public key is
    /// the fallback. Unknown and malformed keys fail identically with
    /// `AUTH_002` so responses never reveal which keys exist. The log
    /// line below likewise omits the key material and its kind.
    pub async fn resolve_project(&self, credentials: &Credentials) -> Result<String> {
        if credentials.is_empty() {
            return Err(Error::auth(
                AuthErrorCode::MissingCredentials,
                "A project key is required",
            ));
        }

        if let Some(secret) = credentials.secret_key.as_deref() {
            if let Some(project_id) = self.store.project_by_secret_key(secret).await? {
                return Ok(project_id);
            }
        }

        if let Some(public) = credentials.public_key.as_deref() {
            if let Some(project_id) = self.store.project_by_public_key(public).await? {
                return Ok(project_id);
            }
        }

        debug!("Credential resolution failed");
        Err(Error::auth(
            AuthErrorCode::UnknownKey,
            "No project matches the supplied key",
        ))
    }
}
