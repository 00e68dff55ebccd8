//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success response for ingestion.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub id: Uuid,
}

impl IngestResponse {
    pub fn success(id: Uuid) -> Self {
        Self { success: true, id }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

/// API error type carrying a coded error response.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub retry_after: Option<u64>,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse::new(msg, code),
            retry_after: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "VALID_001", msg)
    }

    pub fn missing_event_name() -> Self {
        Self::with_code(
            StatusCode::BAD_REQUEST,
            "VALID_002",
            "eventName is required",
        )
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::PAYLOAD_TOO_LARGE, "VALID_003", msg)
    }

    pub fn unauthorized(code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::UNAUTHORIZED, code, msg)
    }

    pub fn rate_limited(msg: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            response: ErrorResponse::new(msg, "RATE_001"),
            retry_after,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "DB_001", msg)
    }

    pub fn validation(code: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ErrorResponse::new("Validation failed", code).with_details(errors),
            retry_after: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        // Add Retry-After header for rate limit responses
        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        response
    }
}

impl From<pulse_core::Error> for ApiError {
    fn from(err: pulse_core::Error) -> Self {
        match &err {
            pulse_core::Error::Auth {
                code,
                message,
                http_status,
            } => {
                let status =
                    StatusCode::from_u16(*http_status).unwrap_or(StatusCode::UNAUTHORIZED);
                ApiError::with_code(status, *code, message)
            }
            pulse_core::Error::Validation {
                code,
                message,
                http_status,
            } => {
                let status =
                    StatusCode::from_u16(*http_status).unwrap_or(StatusCode::BAD_REQUEST);
                ApiError::with_code(status, *code, message)
            }
            pulse_core::Error::RateLimit {
                message,
                retry_after,
                ..
            } => ApiError::rate_limited(message, *retry_after),
            pulse_core::Error::Store { code, message, .. } => {
                ApiError::with_code(StatusCode::INTERNAL_SERVER_ERROR, *code, message)
            }
            pulse_core::Error::Serialization(e) => ApiError::bad_request(e.to_string()),
            pulse_core::Error::Internal(msg) => ApiError::internal(msg),
        }
    }
}
