//! Issuance rate-limit window per identifier.

use chrono::{DateTime, Duration, Utc};

/// Issuance requests counted in `[window_start, window_start + window)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitWindow {
    pub window_start: DateTime<Utc>,
    pub request_count: u32,
    pub last_ip: String,
}

impl RateLimitWindow {
    /// Open a window for the first request seen
    pub fn start(now: DateTime<Utc>, ip: &str) -> Self {
        Self {
            window_start: now,
            request_count: 1,
            last_ip: ip.to_string(),
        }
    }

    pub fn resets_at(&self, window: Duration) -> DateTime<Utc> {
        self.window_start + window
    }

    pub fn is_elapsed(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now > self.resets_at(window)
    }
}
