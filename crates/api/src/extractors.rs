//! Request extractors.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Caller identity for rate limiting.
///
/// First entry of `X-Forwarded-For`, falling back to the literal
/// `"unknown"` so all address-less callers share one throttle budget.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|h| h.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientIp(ip))
    }
}
