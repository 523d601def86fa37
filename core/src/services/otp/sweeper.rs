//! Periodic eviction of expired records, stale windows and lapsed blocks
//!
//! Lookups already treat expired entries as absent; the sweep only bounds
//! memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::store::OtpSecurityStore;

/// Background sweeper over an `OtpSecurityStore`
pub struct EvictionScheduler {
    store: Arc<OtpSecurityStore>,
    interval: Duration,
}

impl EvictionScheduler {
    /// Sweep at the store's configured interval
    pub fn new(store: Arc<OtpSecurityStore>) -> Self {
        let interval = store.config().sweep_interval;
        Self::with_interval(store, interval)
    }

    pub fn with_interval(store: Arc<OtpSecurityStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one sweep, taking each map's lock in turn
    pub fn run_sweep(&self) -> SweepResult {
        let result = SweepResult {
            expired_records: self.store.records().purge_expired(),
            stale_windows: self.store.rate_limiter().purge_stale(),
            expired_blocks: self.store.blocks().purge_expired(),
        };

        if result.total_cleaned() > 0 {
            info!(
                event = "otp_sweep_completed",
                expired_records = result.expired_records,
                stale_windows = result.stale_windows,
                expired_blocks = result.expired_blocks,
                "Evicted stale OTP security state"
            );
        } else {
            debug!(event = "otp_sweep_completed", "Nothing to evict");
        }

        result
    }

    /// Spawn the sweep loop on the current tokio runtime
    ///
    /// The task runs until the returned handle is aborted.
    pub fn start_background_task(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                event = "otp_sweeper_started",
                interval_ms = self.interval.as_millis() as u64,
                "OTP eviction sweep started"
            );

            let mut timer = tokio::time::interval(self.interval);
            // The first tick completes immediately
            timer.tick().await;

            loop {
                timer.tick().await;
                self.run_sweep();
            }
        })
    }
}

/// Entries removed by one sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    pub expired_records: usize,
    pub stale_windows: usize,
    pub expired_blocks: usize,
}

impl SweepResult {
    pub fn total_cleaned(&self) -> usize {
        self.expired_records + self.stale_windows + self.expired_blocks
    }
}
