//! Entity definitions for verification and rate-limit state

pub mod rate_limit_record;
pub mod verification_record;

pub use rate_limit_record::RateLimitRecord;
pub use verification_record::VerificationRecord;
