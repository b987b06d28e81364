//! Shared primitives for all Rust crates in Pharmadex.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across Pharmadex crates.
pub type AppResult<T> = Result<T, AppError>;

/// Identifier assigned by the persistence layer on create.
pub type RecordId = i64;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn error_messages_carry_their_category() {
        let error = AppError::Validation("item code is required".to_owned());
        assert_eq!(error.to_string(), "validation error: item code is required");

        let error = AppError::NotFound("item 42 does not exist".to_owned());
        assert_eq!(error.to_string(), "not found: item 42 does not exist");
    }
}
