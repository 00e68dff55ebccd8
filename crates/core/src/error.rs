//! Unified error types for the telemetry pipeline.
//!
//! Error codes:
//! - AUTH_001-002: Credential errors
//! - VALID_001-003: Validation errors
//! - RATE_001: Rate limit errors
//! - DB_001-002: Event store errors

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Credential error codes.
///
/// Unknown and malformed keys share a single code so responses never
/// reveal which keys exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    /// AUTH_001: No public or secret key supplied
    MissingCredentials,
    /// AUTH_002: No project resolved from the supplied key(s)
    UnknownKey,
}

impl AuthErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "AUTH_001",
            Self::UnknownKey => "AUTH_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        401
    }
}

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Unparseable body or field out of bounds
    InvalidFormat,
    /// VALID_002: Missing or empty eventName
    MissingEventName,
    /// VALID_003: Body exceeds the 50KiB ingest limit
    PayloadTooLarge,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "VALID_001",
            Self::MissingEventName => "VALID_002",
            Self::PayloadTooLarge => "VALID_003",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidFormat => 400,
            Self::MissingEventName => 400,
            Self::PayloadTooLarge => 413,
        }
    }
}

/// Rate limit error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitErrorCode {
    /// RATE_001: Fixed-window limit exceeded
    Exceeded,
}

impl RateLimitErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Exceeded => "RATE_001",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        429
    }
}

/// Event store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// DB_001: Failed to write an event
    WriteFailed,
    /// DB_002: Failed to read events back
    QueryFailed,
}

impl StoreErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WriteFailed => "DB_001",
            Self::QueryFailed => "DB_002",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        500
    }
}

/// Unified error type for the telemetry pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Credential error with code.
    #[error("[{code}] {message}")]
    Auth {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Validation error with code.
    #[error("[{code}] {message}")]
    Validation {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Rate limit error with code.
    #[error("[{code}] {message}")]
    RateLimit {
        code: &'static str,
        message: String,
        http_status: u16,
        retry_after: Option<u64>,
    },

    /// Event store error with code.
    #[error("[{code}] {message}")]
    Store {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a credential error.
    pub fn auth(code: AuthErrorCode, msg: impl Into<String>) -> Self {
        Self::Auth {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a validation error.
    pub fn validation(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::Validation {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a rate limit error.
    pub fn rate_limit(msg: impl Into<String>, retry_after: Option<u64>) -> Self {
        let code = RateLimitErrorCode::Exceeded;
        Self::RateLimit {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
            retry_after,
        }
    }

    /// Create an event store error.
    pub fn store(code: StoreErrorCode, msg: impl Into<String>) -> Self {
        Self::Store {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Auth { http_status, .. } => *http_status,
            Self::Validation { http_status, .. } => *http_status,
            Self::RateLimit { http_status, .. } => *http_status,
            Self::Store { http_status, .. } => *http_status,
            Self::Serialization(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Auth { code, .. } => Some(code),
            Self::Validation { code, .. } => Some(code),
            Self::RateLimit { code, .. } => Some(code),
            Self::Store { code, .. } => Some(code),
            _ => None,
        }
    }
}
