//! Result types for the login facade

use chrono::{DateTime, Utc};

use crate::services::verification::VerifyOutcome;

/// Access and refresh token pair established after a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of asking for a verification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendCodeOutcome {
    /// Code issued and handed to the mailer.
    Sent {
        /// When the issued code expires.
        expires_at: DateTime<Utc>,
    },
    /// Request refused by the rate limiter. Map to a 429-equivalent
    /// response; the client may retry after the given interval.
    RateLimited {
        retry_after_seconds: u64,
    },
}

/// Result of submitting a verification code.
///
/// Callers should reduce every `Rejected` variant to one generic
/// "invalid or expired code" message; the specific kind is for internal
/// diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    /// Code accepted; a session was established.
    Success { tokens: SessionTokens },
    /// Code rejected. The outcome is never `Success`.
    Rejected { outcome: VerifyOutcome },
}

impl LoginResult {
    /// Whether a session was established.
    pub fn is_success(&self) -> bool {
        matches!(self, LoginResult::Success { .. })
    }
}
