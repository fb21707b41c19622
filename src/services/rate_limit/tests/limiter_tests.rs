//! Unit tests for the sliding-window rate limiter and its one-shot block

use std::sync::Arc;

use chrono::Duration;

use crate::clock::{Clock, ManualClock};
use crate::config::RateLimitConfig;
use crate::services::rate_limit::{RateLimitDecision, RateLimitKey, SlidingWindowRateLimiter};

fn limiter_with_clock(
    config: RateLimitConfig,
) -> (SlidingWindowRateLimiter, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::from_system_time());
    let limiter = SlidingWindowRateLimiter::new(config, clock.clone()).unwrap();
    (limiter, clock)
}

fn email_key(s: &str) -> RateLimitKey {
    RateLimitKey::Email(s.to_string())
}

#[test]
fn admits_up_to_the_maximum_within_a_window() {
    // Scenario: five requests at t=0..4 all pass, the sixth is denied for a
    // full window.
    let (limiter, clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 5,
        window_seconds: 3600,
        ..Default::default()
    });
    let key = email_key("a@x.com");

    for expected_remaining in (0..5).rev() {
        assert_eq!(
            limiter.check(&key),
            RateLimitDecision::Allowed {
                remaining: expected_remaining
            }
        );
        clock.advance(Duration::seconds(1));
    }

    assert_eq!(
        limiter.check(&key),
        RateLimitDecision::Denied {
            retry_after_seconds: 3600
        }
    );
}

#[test]
fn block_denies_until_it_elapses_then_admits() {
    // One-shot block policy: the block set at t=5 runs to t=3605 and is not
    // extended by denied attempts in between. The first check at t=3605
    // finds the window slid empty and admits.
    let (limiter, clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 5,
        window_seconds: 3600,
        ..Default::default()
    });
    let key = email_key("a@x.com");

    for _ in 0..5 {
        assert!(limiter.check(&key).is_allowed());
        clock.advance(Duration::seconds(1));
    }
    // t=5: window full, block set until t=3605.
    assert_eq!(
        limiter.check(&key),
        RateLimitDecision::Denied {
            retry_after_seconds: 3600
        }
    );

    // Hammering while blocked keeps getting shrinking retry hints and does
    // not push the deadline out.
    clock.advance(Duration::seconds(1000)); // t=1005
    assert_eq!(
        limiter.check(&key),
        RateLimitDecision::Denied {
            retry_after_seconds: 2600
        }
    );
    clock.advance(Duration::seconds(2599)); // t=3604
    assert_eq!(
        limiter.check(&key),
        RateLimitDecision::Denied {
            retry_after_seconds: 1
        }
    );

    clock.advance(Duration::seconds(1)); // t=3605, block elapsed
    assert_eq!(limiter.check(&key), RateLimitDecision::Allowed { remaining: 4 });
}

#[test]
fn window_slides_rather_than_resets() {
    let (limiter, clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 2,
        window_seconds: 100,
        ..Default::default()
    });
    let key = email_key("a@x.com");

    assert!(limiter.check(&key).is_allowed()); // t=0
    clock.advance(Duration::seconds(60));
    assert!(limiter.check(&key).is_allowed()); // t=60

    // t=101: the t=0 entry has slid out, one slot is free again.
    clock.advance(Duration::seconds(41));
    assert_eq!(limiter.check(&key), RateLimitDecision::Allowed { remaining: 0 });

    // t=102: t=60 and t=101 still occupy the window.
    clock.advance(Duration::seconds(1));
    assert!(!limiter.check(&key).is_allowed());
}

#[test]
fn denied_requests_are_not_counted_into_the_window() {
    let (limiter, clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 2,
        window_seconds: 100,
        ..Default::default()
    });
    let key = email_key("a@x.com");

    assert!(limiter.check(&key).is_allowed());
    assert!(limiter.check(&key).is_allowed());
    assert!(!limiter.check(&key).is_allowed()); // sets block until t=100

    // After block and window both elapse, the full budget is back: the
    // denied attempts left no trace in the request history.
    clock.advance(Duration::seconds(101));
    assert_eq!(limiter.check(&key), RateLimitDecision::Allowed { remaining: 1 });
}

#[test]
fn email_and_client_id_limits_are_independent() {
    let (limiter, _clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 2,
        max_requests_per_id: 4,
        window_seconds: 3600,
    });

    let email = email_key("a@x.com");
    let id = RateLimitKey::ClientId("a@x.com".to_string()); // same text, different namespace

    assert!(limiter.check(&email).is_allowed());
    assert!(limiter.check(&email).is_allowed());
    assert!(!limiter.check(&email).is_allowed());

    // The client-id key with identical text is untouched.
    for _ in 0..4 {
        assert!(limiter.check(&id).is_allowed());
    }
    assert!(!limiter.check(&id).is_allowed());
}

#[test]
fn pair_check_records_both_sides_even_when_one_denies() {
    let (limiter, _clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 1,
        max_requests_per_id: 10,
        window_seconds: 3600,
    });

    assert!(limiter.check_pair("a@x.com", "device-1").is_allowed());

    // Email side is now exhausted; every further pair check is denied but
    // keeps charging the client id.
    for _ in 0..9 {
        assert!(!limiter.check_pair("a@x.com", "device-1").is_allowed());
    }

    // The client id absorbed one allowed request plus nine recorded ones: a
    // fresh email on the same device must find the id budget spent.
    let decision = limiter.check_pair("b@x.com", "device-1");
    assert!(!decision.is_allowed());
}

#[test]
fn pair_check_denies_when_client_id_is_exhausted() {
    let (limiter, _clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 10,
        max_requests_per_id: 2,
        window_seconds: 3600,
    });

    assert!(limiter.check_pair("a@x.com", "device-1").is_allowed());
    assert!(limiter.check_pair("b@x.com", "device-1").is_allowed());
    assert!(!limiter.check_pair("c@x.com", "device-1").is_allowed());
}

#[test]
fn purge_drops_keys_idle_for_two_windows() {
    let (limiter, clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 5,
        window_seconds: 100,
        ..Default::default()
    });

    assert!(limiter.check(&email_key("idle@x.com")).is_allowed());
    clock.advance(Duration::seconds(150));
    assert!(limiter.check(&email_key("active@x.com")).is_allowed());
    assert_eq!(limiter.tracked_keys(), 2);

    // idle is 201s old (> 2x100), active is 51s old.
    clock.advance(Duration::seconds(51));
    assert_eq!(limiter.purge(clock.now()), 1);
    assert_eq!(limiter.tracked_keys(), 1);
}

#[test]
fn purge_keeps_blocked_keys_until_the_block_ages_out() {
    let (limiter, clock) = limiter_with_clock(RateLimitConfig {
        max_requests_per_email: 1,
        window_seconds: 100,
        ..Default::default()
    });
    let key = email_key("a@x.com");

    assert!(limiter.check(&key).is_allowed());
    assert!(!limiter.check(&key).is_allowed()); // block until t=100

    // t=250: last request is 250s old but the block instant (t=100) is only
    // 150s old, inside the 200s retention.
    clock.advance(Duration::seconds(250));
    assert_eq!(limiter.purge(clock.now()), 0);

    // t=301: the block instant is now 201s old.
    clock.advance(Duration::seconds(51));
    assert_eq!(limiter.purge(clock.now()), 1);
    assert_eq!(limiter.tracked_keys(), 0);
}

#[test]
fn zero_maximum_fails_construction() {
    let clock = Arc::new(ManualClock::from_system_time());
    let result = SlidingWindowRateLimiter::new(
        RateLimitConfig {
            max_requests_per_email: 0,
            ..Default::default()
        },
        clock,
    );
    assert!(result.is_err());
}
