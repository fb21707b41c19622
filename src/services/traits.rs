//! Traits for external collaborators
//!
//! The core owns no I/O. Mail delivery, signed-token issuance, and the
//! backup pipeline are reached through these traits; all of them run outside
//! the stores' critical sections.

use async_trait::async_trait;

/// Trait for the outbound mail service.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a verification code to an email address.
    ///
    /// Fire-and-forget from the core's point of view: a failure is reported
    /// to the caller and never retried here.
    async fn send_code(&self, email: &str, code: &str) -> Result<(), String>;
}

/// Trait for the opaque signed-token capability.
///
/// Used only after a verification code validates successfully. Signing
/// mechanics, claims layout, and key handling all live behind it.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token for `subject` valid for `ttl_seconds`.
    async fn issue(&self, subject: &str, ttl_seconds: i64) -> Result<String, String>;

    /// Verify a token and return its subject.
    async fn verify(&self, token: &str) -> Result<String, String>;
}

/// Trait for the external backup pipeline.
#[async_trait]
pub trait BackupRunner: Send + Sync {
    /// Perform one backup run. Export, compression, encryption, and delivery
    /// are all internal to the implementation.
    async fn perform_backup(&self) -> Result<(), String>;
}
