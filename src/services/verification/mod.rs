//! Verification code store for email-code authentication
//!
//! This module owns the full code lifecycle:
//! - cryptographically secure code generation on issue
//! - validation with constant-time comparison and attempt tracking
//! - single-use consumption and lazy expiry
//! - eager expiry via the cleanup scheduler's purge

mod store;
mod types;

#[cfg(test)]
mod tests;

pub use store::{IssuedCode, VerificationStore};
pub use types::VerifyOutcome;
