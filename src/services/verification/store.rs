//! In-memory verification code store

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::VerificationConfig;
use crate::domain::entities::VerificationRecord;
use crate::errors::DomainResult;

use super::types::VerifyOutcome;

/// A freshly issued verification code.
///
/// The code is handed to the mailer by the caller; the store keeps its own
/// copy inside the record and never logs it.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// Correlation id of the backing record, safe to log.
    pub id: Uuid,
    /// The decimal code to deliver to the user.
    pub code: String,
    /// When the code stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Store of active verification records, keyed by email address.
///
/// All operations are synchronous map accesses under one mutex; the lock is
/// never held across I/O. Expired records are removed lazily on access and
/// eagerly by [`purge`](VerificationStore::purge).
pub struct VerificationStore {
    records: Mutex<HashMap<String, VerificationRecord>>,
    config: VerificationConfig,
    clock: Arc<dyn Clock>,
}

impl VerificationStore {
    /// Create a store, validating the configuration.
    pub fn new(config: VerificationConfig, clock: Arc<dyn Clock>) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            records: Mutex::new(HashMap::new()),
            config,
            clock,
        })
    }

    /// Issue a code for `identity`, replacing any existing record.
    ///
    /// Replacement means a previously issued code stops validating the
    /// moment a new one is issued, so codes never accumulate per identity.
    /// No rate limiting happens here; that is the caller's responsibility.
    pub fn issue(&self, identity: &str) -> IssuedCode {
        let code = self.generate_code();
        let now = self.clock.now();
        let record = VerificationRecord::new(
            identity.to_string(),
            code.clone(),
            now,
            Duration::seconds(self.config.code_ttl_seconds),
        );
        let issued = IssuedCode {
            id: record.id,
            code,
            expires_at: record.expires_at,
        };

        let mut records = self.guard();
        let replaced = records.insert(identity.to_string(), record).is_some();
        drop(records);

        tracing::info!(
            identity = identity,
            record_id = %issued.id,
            replaced_previous = replaced,
            expires_at = %issued.expires_at,
            event = "code_issued",
            "Issued verification code"
        );

        issued
    }

    /// Validate a submitted code for `identity`.
    ///
    /// Check order: existence, expiry, attempt budget, then the code itself.
    /// Expiry and exhaustion win even when the submitted code is correct.
    /// A match consumes the record; the code is single-use.
    pub fn validate(&self, identity: &str, submitted: &str) -> VerifyOutcome {
        let now = self.clock.now();
        let mut records = self.guard();

        let outcome = match records.get_mut(identity) {
            None => VerifyOutcome::NotFound,
            Some(record) => {
                if record.is_expired(now) {
                    records.remove(identity);
                    VerifyOutcome::Expired
                } else if record.attempts_exhausted(self.config.max_attempts) {
                    records.remove(identity);
                    VerifyOutcome::AttemptsExceeded
                } else if record.code_matches(submitted) {
                    records.remove(identity);
                    VerifyOutcome::Success
                } else {
                    record.record_failed_attempt();
                    VerifyOutcome::Mismatch {
                        remaining_attempts: record.remaining_attempts(self.config.max_attempts),
                    }
                }
            }
        };
        drop(records);

        tracing::debug!(
            identity = identity,
            outcome = outcome.kind(),
            event = "code_validated",
            "Validated verification code submission"
        );

        outcome
    }

    /// Remove every record that expired before `now`. Returns the number of
    /// records removed. Called by the cleanup scheduler.
    pub fn purge(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.guard();
        let before = records.len();
        records.retain(|_, record| record.expires_at >= now);
        let removed = before - records.len();
        drop(records);

        if removed > 0 {
            tracing::info!(
                removed = removed,
                event = "verification_purged",
                "Purged expired verification records"
            );
        }
        removed
    }

    /// Number of active records, for observability.
    pub fn pending_count(&self) -> usize {
        self.guard().len()
    }

    /// Generate a decimal code of the configured length from the OS CSPRNG.
    ///
    /// The code is the sole credential gating session creation, so a
    /// general-purpose PRNG is not acceptable here. Per-digit sampling keeps
    /// the distribution uniform for any configured length.
    fn generate_code(&self) -> String {
        let mut rng = OsRng;
        (0..self.config.code_length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, VerificationRecord>> {
        // Critical sections are short map operations that cannot panic
        // midway, so a poisoned map is still consistent.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
