//! Sliding-window rate limiting for verification requests
//!
//! Two independent limits apply to every "send code" request: one keyed by
//! the email address, one keyed by the client id. Both use the same window
//! and live in one store; denial is a normal outcome the caller maps to a
//! 429-style response.

mod limiter;

#[cfg(test)]
mod tests;

pub use limiter::{RateLimitDecision, RateLimitKey, SlidingWindowRateLimiter};
