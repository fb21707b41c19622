//! Services for verification, rate limiting, cleanup, and the login facade

pub mod auth;
pub mod cleanup;
pub mod rate_limit;
pub mod traits;
pub mod verification;
