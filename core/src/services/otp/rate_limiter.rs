//! Per-identifier issuance rate limiting
//!
//! Exceeding the cap blocks the requesting IP, not the identifier.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;

use crate::domain::entities::{BlockReason, RateLimitWindow};
use crate::domain::value_objects::Identifier;

use super::block_registry::IpBlockRegistry;
use super::clock::Clock;
use super::lock;
use super::types::{RateDecision, WindowSnapshot};

pub struct RateLimiter {
    windows: Mutex<HashMap<Identifier, RateLimitWindow>>,
    blocks: Arc<IpBlockRegistry>,
    clock: Arc<dyn Clock>,
    window: Duration,
    max_requests: u32,
    block_duration: Duration,
}

impl RateLimiter {
    pub fn new(
        blocks: Arc<IpBlockRegistry>,
        clock: Arc<dyn Clock>,
        window: Duration,
        max_requests: u32,
        block_duration: Duration,
    ) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            blocks,
            clock,
            window,
            max_requests,
            block_duration,
        }
    }

    /// Count an issuance request and decide whether to admit it
    ///
    /// The decision is taken under the window lock; a resulting IP block is
    /// registered after that lock is released.
    pub fn check_and_record(&self, identifier: &Identifier, ip: &str) -> RateDecision {
        let now = self.clock.now();

        let admitted = {
            let mut windows = lock(&self.windows);
            match windows.entry(identifier.clone()) {
                Entry::Occupied(mut entry) if !entry.get().is_elapsed(now, self.window) => {
                    let window = entry.get_mut();
                    window.last_ip = ip.to_string();
                    if window.request_count >= self.max_requests {
                        None
                    } else {
                        window.request_count += 1;
                        Some((window.request_count, window.resets_at(self.window)))
                    }
                }
                Entry::Occupied(mut entry) => {
                    // Elapsed: restart the window
                    entry.insert(RateLimitWindow::start(now, ip));
                    let window = entry.get();
                    Some((window.request_count, window.resets_at(self.window)))
                }
                Entry::Vacant(entry) => {
                    let window = entry.insert(RateLimitWindow::start(now, ip));
                    Some((window.request_count, window.resets_at(self.window)))
                }
            }
        };

        match admitted {
            Some((request_count, window_resets_at)) => {
                tracing::debug!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "otp_request_admitted",
                    request_count = request_count,
                    max_requests = self.max_requests,
                    "Issuance request within rate limit"
                );
                RateDecision::Allowed {
                    request_count,
                    window_resets_at,
                }
            }
            None => {
                tracing::warn!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "rate_limit_exceeded",
                    max_requests = self.max_requests,
                    "Verification code request rate limit exceeded"
                );
                let block = self
                    .blocks
                    .block(ip, BlockReason::RateLimitExceeded, self.block_duration);
                RateDecision::Denied {
                    reason: block.reason,
                    block_remaining_ms: block.remaining_ms(now),
                }
            }
        }
    }

    /// Requests still admissible for an identifier in its current window
    pub fn remaining_requests(&self, identifier: &Identifier) -> u32 {
        let now = self.clock.now();
        match lock(&self.windows).get(identifier) {
            Some(window) if !window.is_elapsed(now, self.window) => {
                self.max_requests.saturating_sub(window.request_count)
            }
            _ => self.max_requests,
        }
    }

    /// Remove every elapsed window, returning how many were dropped
    pub fn purge_stale(&self) -> usize {
        let now = self.clock.now();
        let mut windows = lock(&self.windows);
        let before = windows.len();
        windows.retain(|_, window| !window.is_elapsed(now, self.window));
        before - windows.len()
    }

    pub fn snapshot(&self, identifier: &Identifier) -> Option<WindowSnapshot> {
        lock(&self.windows).get(identifier).map(|window| WindowSnapshot {
            window_start: window.window_start,
            window_resets_at: window.resets_at(self.window),
            request_count: window.request_count,
            remaining_requests: self.max_requests.saturating_sub(window.request_count),
            last_ip: window.last_ip.clone(),
        })
    }

    pub fn len(&self) -> usize {
        lock(&self.windows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.windows).clear();
    }
}
