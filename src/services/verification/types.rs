//! Outcome types for code validation

/// Result of validating a submitted code.
///
/// Every variant is an expected outcome. Callers should collapse all
/// non-success variants into one generic user-facing message and keep the
/// specific kind for internal logging, so responses do not reveal whether a
/// code was ever issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code matched; the record has been consumed.
    Success,
    /// Code did not match; the record remains with one more failed attempt.
    Mismatch {
        /// Attempts left before the record is invalidated.
        remaining_attempts: u32,
    },
    /// Code expired; the record has been removed.
    Expired,
    /// Attempt budget spent; the record has been removed.
    AttemptsExceeded,
    /// No active record: never issued, already consumed, or already swept.
    NotFound,
}

impl VerifyOutcome {
    /// Whether this outcome established the caller's identity.
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success)
    }

    /// Short kind label for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyOutcome::Success => "success",
            VerifyOutcome::Mismatch { .. } => "mismatch",
            VerifyOutcome::Expired => "expired",
            VerifyOutcome::AttemptsExceeded => "attempts_exceeded",
            VerifyOutcome::NotFound => "not_found",
        }
    }
}
