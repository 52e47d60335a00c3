//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// rules, conflicts). The HTTP layer owns the mapping to status codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request value failed shape validation (malformed/missing input).
    #[error("{0}")]
    Validation(String),

    /// A uniqueness conflict (duplicate field, reservation slot taken).
    #[error("{0}")]
    Conflict(String),

    /// A referenced entity is absent.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credentials/token at the boundary.
    #[error("unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed to perform the action.
    #[error("{0}")]
    Forbidden(String),

    /// A domain rule was violated (lead time, inactive doctor, expired or
    /// invalid token, password not yet rotated, account already verified).
    #[error("{0}")]
    Rule(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Unexpected store/hashing/signing failure.
    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn rule(msg: impl Into<String>) -> Self {
        Self::Rule(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
