//! # Verigate
//!
//! Ephemeral security state for email-code login flows: issuance and
//! validation of short-lived, single-use verification codes, a sliding-window
//! request rate limiter, and a background cleanup scheduler that sweeps both.
//!
//! Everything here is in-process and in-memory. HTTP routing, user
//! persistence, token signing, mail delivery, and the backup pipeline are
//! external collaborators reached through the traits in
//! [`services::traits`].

pub mod clock;
pub mod config;
pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CleanupConfig, RateLimitConfig, TokenConfig, VerificationConfig};
pub use errors::{DomainError, DomainResult};
pub use services::auth::{AuthService, LoginResult, SendCodeOutcome, SessionTokens};
pub use services::cleanup::{CleanupHandle, CleanupScheduler, SweepReport};
pub use services::rate_limit::{RateLimitDecision, RateLimitKey, SlidingWindowRateLimiter};
pub use services::traits::{BackupRunner, Mailer, TokenIssuer};
pub use services::verification::{IssuedCode, VerificationStore, VerifyOutcome};
