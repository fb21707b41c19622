//! Tests for the sliding-window rate limiter

#[cfg(test)]
mod limiter_tests;
