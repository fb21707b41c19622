//! In-memory sliding-window rate limiter

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::clock::Clock;
use crate::config::RateLimitConfig;
use crate::domain::entities::RateLimitRecord;
use crate::errors::DomainResult;

/// A limiting key, namespaced by kind so an email and a client id with the
/// same text can never collide in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitKey {
    /// The user-supplied email address.
    Email(String),
    /// The client/device identifier.
    ClientId(String),
}

impl RateLimitKey {
    /// Namespaced storage key.
    pub fn storage_key(&self) -> String {
        match self {
            RateLimitKey::Email(email) => format!("email:{}", email),
            RateLimitKey::ClientId(id) => format!("id:{}", id),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RateLimitKey::Email(_) => "email",
            RateLimitKey::ClientId(_) => "id",
        }
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request admitted and recorded.
    Allowed {
        /// Admissions left in the current window for the tightest key.
        remaining: u32,
    },
    /// Request refused. Not an error; callers translate it into a
    /// 429-equivalent response.
    Denied {
        /// Seconds until the caller may retry.
        retry_after_seconds: u64,
    },
}

impl RateLimitDecision {
    /// Whether the request was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

/// Sliding-window rate limiter over namespaced keys.
///
/// Block policy: one-shot. When the window fills, `blocked_until` is set to
/// `now + window` exactly once; denied attempts while blocked do not extend
/// it. The escalating variant would let an attacker hammering a victim's
/// email lock the victim out indefinitely, so it is deliberately not used.
pub struct SlidingWindowRateLimiter {
    records: Mutex<HashMap<String, RateLimitRecord>>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl SlidingWindowRateLimiter {
    /// Create a limiter, validating the configuration.
    pub fn new(config: RateLimitConfig, clock: Arc<dyn Clock>) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            records: Mutex::new(HashMap::new()),
            config,
            clock,
        })
    }

    /// Check one key and record the request if admitted.
    ///
    /// Order inside the critical section: prune the window, honor a live
    /// block, fill-check the window (setting the block on the call that
    /// finds it full), then append.
    pub fn check(&self, key: &RateLimitKey) -> RateLimitDecision {
        let now = self.clock.now();
        let mut records = self.guard();
        let decision = self.check_locked(&mut records, key, now);
        drop(records);

        if let RateLimitDecision::Denied { retry_after_seconds } = &decision {
            tracing::warn!(
                key_kind = key.kind(),
                retry_after_seconds = *retry_after_seconds,
                event = "rate_limit_denied",
                "Request denied by rate limiter"
            );
        }
        decision
    }

    /// Check the email limit and the client-id limit for one logical request.
    ///
    /// Both sides are evaluated and recorded no matter which one denies, so
    /// rotating one identifier does not reset exposure on the other. A deny
    /// on either side wins and carries the longer retry interval.
    pub fn check_pair(&self, email: &str, client_id: &str) -> RateLimitDecision {
        let email_key = RateLimitKey::Email(email.to_string());
        let id_key = RateLimitKey::ClientId(client_id.to_string());

        let now = self.clock.now();
        let mut records = self.guard();
        let email_decision = self.check_locked(&mut records, &email_key, now);
        let id_decision = self.check_locked(&mut records, &id_key, now);
        drop(records);

        let decision = match (email_decision, id_decision) {
            (
                RateLimitDecision::Allowed { remaining: a },
                RateLimitDecision::Allowed { remaining: b },
            ) => RateLimitDecision::Allowed {
                remaining: a.min(b),
            },
            (RateLimitDecision::Denied { retry_after_seconds: a }, RateLimitDecision::Denied { retry_after_seconds: b }) => {
                RateLimitDecision::Denied {
                    retry_after_seconds: a.max(b),
                }
            }
            (RateLimitDecision::Denied { retry_after_seconds }, _)
            | (_, RateLimitDecision::Denied { retry_after_seconds }) => {
                RateLimitDecision::Denied { retry_after_seconds }
            }
        };

        if let RateLimitDecision::Denied { retry_after_seconds } = &decision {
            tracing::warn!(
                retry_after_seconds = *retry_after_seconds,
                event = "rate_limit_denied_pair",
                "Verification request denied by rate limiter"
            );
        }
        decision
    }

    /// Drop keys with no activity in the last two windows. Returns the
    /// number of keys removed. Called by the cleanup scheduler.
    pub fn purge(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.window() * 2;
        let mut records = self.guard();
        let before = records.len();
        records.retain(|_, record| !record.is_stale(cutoff));
        let removed = before - records.len();
        drop(records);

        if removed > 0 {
            tracing::info!(
                removed = removed,
                event = "rate_limit_purged",
                "Purged stale rate-limit records"
            );
        }
        removed
    }

    /// Number of tracked keys, for observability.
    pub fn tracked_keys(&self) -> usize {
        self.guard().len()
    }

    fn check_locked(
        &self,
        records: &mut HashMap<String, RateLimitRecord>,
        key: &RateLimitKey,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let window = self.window();
        let max_requests = self.max_requests_for(key);
        let record = records.entry(key.storage_key()).or_default();

        record.prune(now, window);

        if let Some(until) = record.blocked_until {
            if now < until {
                let retry = (until - now).num_seconds().max(1) as u64;
                return RateLimitDecision::Denied {
                    retry_after_seconds: retry,
                };
            }
            // Block elapsed; clear it so the record can go stale.
            record.blocked_until = None;
        }

        if record.requests.len() as u32 >= max_requests {
            record.blocked_until = Some(now + window);
            return RateLimitDecision::Denied {
                retry_after_seconds: window.num_seconds().max(1) as u64,
            };
        }

        record.requests.push(now);
        RateLimitDecision::Allowed {
            remaining: max_requests - record.requests.len() as u32,
        }
    }

    fn max_requests_for(&self, key: &RateLimitKey) -> u32 {
        match key {
            RateLimitKey::Email(_) => self.config.max_requests_per_email,
            RateLimitKey::ClientId(_) => self.config.max_requests_per_id,
        }
    }

    fn window(&self) -> Duration {
        Duration::seconds(self.config.window_seconds)
    }

    fn guard(&self) -> MutexGuard<'_, HashMap<String, RateLimitRecord>> {
        // Critical sections are short map operations that cannot panic
        // midway, so a poisoned map is still consistent.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
