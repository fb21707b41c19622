//! Background cleanup scheduler

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::CleanupConfig;
use crate::errors::DomainResult;
use crate::services::rate_limit::SlidingWindowRateLimiter;
use crate::services::traits::BackupRunner;
use crate::services::verification::VerificationStore;

/// Summary of one sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Expired verification records removed.
    pub verification_removed: usize,
    /// Stale rate-limit keys removed.
    pub rate_limit_removed: usize,
    /// Whether this sweep invoked the backup pipeline.
    pub backup_ran: bool,
    /// Errors encountered during the sweep; never fatal.
    pub errors: Vec<String>,
}

impl SweepReport {
    /// Whether the sweep finished without errors.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total entries removed across both stores.
    pub fn total_removed(&self) -> usize {
        self.verification_removed + self.rate_limit_removed
    }
}

/// Periodic sweeper for the two stores plus the long-interval backup hook.
///
/// The last backup instant can be seeded at construction so a process
/// restart shortly after a backup does not immediately run another one.
pub struct CleanupScheduler {
    verification: Arc<VerificationStore>,
    rate_limiter: Arc<SlidingWindowRateLimiter>,
    backup: Arc<dyn BackupRunner>,
    clock: Arc<dyn Clock>,
    config: CleanupConfig,
    last_backup_at: Mutex<Option<DateTime<Utc>>>,
}

impl CleanupScheduler {
    /// Create a scheduler, validating the configuration.
    pub fn new(
        verification: Arc<VerificationStore>,
        rate_limiter: Arc<SlidingWindowRateLimiter>,
        backup: Arc<dyn BackupRunner>,
        clock: Arc<dyn Clock>,
        config: CleanupConfig,
        last_backup_at: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            verification,
            rate_limiter,
            backup,
            clock,
            config,
            last_backup_at: Mutex::new(last_backup_at),
        })
    }

    /// Run one sweep: purge both stores, then run the backup if its interval
    /// has elapsed.
    ///
    /// Safe to race with live `issue`/`validate`/`check` calls; the stores
    /// serialize access internally. The backup runs outside any lock.
    pub async fn run_sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport {
            verification_removed: self.verification.purge(now),
            rate_limit_removed: self.rate_limiter.purge(now),
            ..Default::default()
        };

        if self.backup_due(now) {
            match self.backup.perform_backup().await {
                Ok(()) => {
                    report.backup_ran = true;
                    self.record_backup(now);
                    info!(event = "backup_completed", "Backup pipeline run completed");
                }
                Err(e) => {
                    error!(error = %e, event = "backup_failed", "Backup pipeline run failed");
                    report.errors.push(format!("Backup error: {}", e));
                }
            }
        }

        info!(
            verification_removed = report.verification_removed,
            rate_limit_removed = report.rate_limit_removed,
            backup_ran = report.backup_ran,
            event = "sweep_completed",
            "Cleanup sweep completed"
        );
        report
    }

    /// Spawn the periodic loop on the current tokio runtime.
    ///
    /// The first tick fires immediately, matching process start. Shutdown
    /// through the returned handle is graceful: an in-flight sweep completes
    /// before the task exits.
    pub fn start(self: Arc<Self>) -> CleanupHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = std::time::Duration::from_secs(self.config.sweep_interval_seconds);

        let task = tokio::spawn(async move {
            info!(
                interval_seconds = self.config.sweep_interval_seconds,
                event = "cleanup_started",
                "Cleanup scheduler started"
            );

            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = self.run_sweep().await;
                        if !report.is_success() {
                            warn!(
                                errors = ?report.errors,
                                event = "sweep_errors",
                                "Cleanup sweep completed with errors"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        info!(event = "cleanup_stopped", "Cleanup scheduler stopped");
                        break;
                    }
                }
            }
        });

        CleanupHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    fn backup_due(&self, now: DateTime<Utc>) -> bool {
        if !self.config.backup_enabled {
            return false;
        }
        let last = *self
            .last_backup_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match last {
            None => true,
            Some(last) => now - last >= Duration::seconds(self.config.backup_interval_seconds),
        }
    }

    fn record_backup(&self, now: DateTime<Utc>) {
        let mut last = self
            .last_backup_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *last = Some(now);
    }

    /// Instant of the most recent backup run, if any.
    pub fn last_backup_at(&self) -> Option<DateTime<Utc>> {
        *self
            .last_backup_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a running cleanup loop.
pub struct CleanupHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CleanupHandle {
    /// Stop the loop and wait for it to finish. An in-flight sweep runs to
    /// completion; no further ticks fire.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
