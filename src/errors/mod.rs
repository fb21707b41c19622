//! Domain-specific error types
//!
//! Everything a user can cause (wrong code, expired code, rate-limit denial)
//! is a typed outcome, not an error. The variants here cover the remaining
//! failure surface: misconfiguration detected at construction time and
//! failures reported by external collaborators.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors produced by the verification core and its collaborators.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid configuration detected at construction time. The only fatal
    /// condition in the crate; nothing at runtime maps to it.
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// Mail delivery reported a failure. The code stays issued; the caller
    /// decides whether to surface or retry.
    #[error("Mail delivery failed: {message}")]
    Mail { message: String },

    /// The signed-token capability reported a failure after a successful
    /// validation.
    #[error("Token operation failed: {message}")]
    Token { message: String },

    /// The external backup pipeline reported a failure during a sweep.
    #[error("Backup failed: {message}")]
    Backup { message: String },
}

impl DomainError {
    /// Stable machine-readable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Configuration { .. } => "INVALID_CONFIGURATION",
            DomainError::Mail { .. } => "MAIL_DELIVERY_FAILED",
            DomainError::Token { .. } => "TOKEN_OPERATION_FAILED",
            DomainError::Backup { .. } => "BACKUP_FAILED",
        }
    }
}
