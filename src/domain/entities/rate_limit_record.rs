//! Sliding-window rate-limit state for one limiting key.

use chrono::{DateTime, Duration, Utc};

/// Request history and block state for a single rate-limit key.
///
/// `requests` only ever holds timestamps inside the current window; every
/// access prunes older entries first. A record with no requests and no live
/// block is indistinguishable from an absent one and gets garbage-collected
/// by the periodic purge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitRecord {
    /// Timestamps of admitted requests inside the current window, oldest first.
    pub requests: Vec<DateTime<Utc>>,

    /// Instant before which every request for this key is refused.
    pub blocked_until: Option<DateTime<Utc>>,
}

impl RateLimitRecord {
    /// Drop request timestamps that have slid out of the window.
    pub fn prune(&mut self, now: DateTime<Utc>, window: Duration) {
        let cutoff = now - window;
        self.requests.retain(|ts| *ts > cutoff);
    }

    /// Whether a block is in force at `now`.
    pub fn is_blocked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.blocked_until, Some(until) if now < until)
    }

    /// Most recent activity on this record, request or block, if any.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        let last_request = self.requests.last().copied();
        match (last_request, self.blocked_until) {
            (Some(r), Some(b)) => Some(r.max(b)),
            (Some(r), None) => Some(r),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    /// Whether the record has seen no activity since `cutoff` and can be
    /// dropped from the store.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        match self.last_activity() {
            Some(instant) => instant < cutoff,
            None => true,
        }
    }
}
