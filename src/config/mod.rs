//! Configuration for the verification core
//!
//! All knobs are injected at construction; nothing reads the environment.
//! Each config validates itself when the owning component is built, and an
//! invalid value is the one fatal condition in the crate
//! ([`DomainError::Configuration`]).

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Configuration for the verification code store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of digits in a generated code.
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds before an issued code expires.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: i64,

    /// Maximum failed validations before a code is invalidated.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            code_ttl_seconds: default_code_ttl(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl VerificationConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.code_length == 0 {
            return Err(DomainError::Configuration {
                message: "code_length must be greater than zero".to_string(),
            });
        }
        if self.code_ttl_seconds <= 0 {
            return Err(DomainError::Configuration {
                message: "code_ttl_seconds must be greater than zero".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(DomainError::Configuration {
                message: "max_attempts must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for the sliding-window rate limiter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Max requests per email address within one window.
    #[serde(default = "default_max_per_email")]
    pub max_requests_per_email: u32,

    /// Max requests per client id within one window.
    #[serde(default = "default_max_per_id")]
    pub max_requests_per_id: u32,

    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_email: default_max_per_email(),
            max_requests_per_id: default_max_per_id(),
            window_seconds: default_window(),
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.max_requests_per_email == 0 || self.max_requests_per_id == 0 {
            return Err(DomainError::Configuration {
                message: "rate limit maximums must be greater than zero".to_string(),
            });
        }
        if self.window_seconds <= 0 {
            return Err(DomainError::Configuration {
                message: "window_seconds must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Configuration for the cleanup scheduler.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CleanupConfig {
    /// Seconds between sweeps of the two stores.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,

    /// Seconds between invocations of the external backup pipeline.
    #[serde(default = "default_backup_interval")]
    pub backup_interval_seconds: i64,

    /// Whether the scheduler triggers backups at all.
    #[serde(default = "default_backup_enabled")]
    pub backup_enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval(),
            backup_interval_seconds: default_backup_interval(),
            backup_enabled: default_backup_enabled(),
        }
    }
}

impl CleanupConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.sweep_interval_seconds == 0 {
            return Err(DomainError::Configuration {
                message: "sweep_interval_seconds must be greater than zero".to_string(),
            });
        }
        if self.backup_interval_seconds < 0 {
            return Err(DomainError::Configuration {
                message: "backup_interval_seconds must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Lifetimes for the session tokens issued after a successful validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: i64,

    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl_seconds: default_access_ttl(),
            refresh_ttl_seconds: default_refresh_ttl(),
        }
    }
}

impl TokenConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.access_ttl_seconds <= 0 || self.refresh_ttl_seconds <= 0 {
            return Err(DomainError::Configuration {
                message: "token lifetimes must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_code_length() -> usize {
    6
}

fn default_code_ttl() -> i64 {
    300 // 5 minutes
}

fn default_max_attempts() -> u32 {
    5
}

fn default_max_per_email() -> u32 {
    5
}

fn default_max_per_id() -> u32 {
    10
}

fn default_window() -> i64 {
    3600 // 1 hour
}

fn default_sweep_interval() -> u64 {
    300 // 5 minutes
}

fn default_backup_interval() -> i64 {
    21600 // 6 hours
}

fn default_access_ttl() -> i64 {
    2_592_000 // 30 days
}

fn default_refresh_ttl() -> i64 {
    86_400 // 1 day
}

fn default_backup_enabled() -> bool {
    true
}
