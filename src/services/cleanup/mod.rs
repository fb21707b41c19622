//! Periodic cleanup of verification and rate-limit state
//!
//! A single background loop sweeps both stores on a short interval and
//! triggers the external backup pipeline on a much longer one. Nothing else
//! in the crate calls `purge`; request handling stays lazy about expiry.

mod scheduler;

#[cfg(test)]
mod tests;

pub use scheduler::{CleanupHandle, CleanupScheduler, SweepReport};
