//! Verification record entity for email-code authentication.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use uuid::Uuid;

/// The active verification record for one email address.
///
/// At most one record exists per identity; issuing a new code replaces the
/// old record wholesale. The record never leaves the store, so the code
/// inside it is only ever touched under the store's lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRecord {
    /// Correlation id, safe to log (the code itself never is).
    pub id: Uuid,

    /// Email address this code was issued for.
    pub identity: String,

    /// The fixed-length decimal verification code.
    pub code: String,

    /// Number of failed validation attempts made so far.
    pub attempts: u32,

    /// Timestamp when the code was issued.
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires.
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Create a record for `identity` holding an already-generated `code`.
    ///
    /// Code generation lives in the store so the CSPRNG choice is in one
    /// place; the entity only carries the result.
    pub fn new(identity: String, code: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            code,
            attempts: 0,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the code has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the failed-attempt budget is spent.
    pub fn attempts_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Constant-time comparison against a submitted code.
    ///
    /// Timing must not reveal how much of the code matched; the length check
    /// short-circuits but lengths are public (fixed per configuration).
    pub fn code_matches(&self, submitted: &str) -> bool {
        if self.code.len() != submitted.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Record one failed validation attempt.
    pub fn record_failed_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Attempts left before the record is invalidated, never below zero.
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }
}
