//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every variant carries a human-readable reason that is safe to show to a
/// client. Store internals never end up in the message.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Account or item not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Balance too low for the requested operation.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Conflict (e.g., duplicate username).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Lock timeout, deadlock or connection fault. Safe to retry.
    #[error("Temporarily unavailable: {0}")]
    Transient(String),

    /// Persisted state may be uncertain.
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::InsufficientFunds(_) => 422,
            Self::Conflict(_) => 409,
            Self::Transient(_) => 503,
            Self::Fatal(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::Conflict(_) => "CONFLICT",
            Self::Transient(_) => "TRANSIENT_ERROR",
            Self::Fatal(_) => "FATAL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the reason string without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::InsufficientFunds(m)
            | Self::Conflict(m)
            | Self::Transient(m)
            | Self::Fatal(m)
            | Self::Internal(m) => m,
        }
    }

    /// Returns true if the caller may retry the whole request from scratch.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
