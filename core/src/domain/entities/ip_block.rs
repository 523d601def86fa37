//! Temporary IP block entity.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Why an IP was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// Too many issuance requests for one identifier
    RateLimitExceeded,
    /// Too many verification attempts for one code
    AttemptsExceeded,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockReason::RateLimitExceeded => "rate limit exceeded",
            BlockReason::AttemptsExceeded => "attempts exceeded",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block held against one IP address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpBlock {
    pub blocked_at: DateTime<Utc>,
    pub blocked_until: DateTime<Utc>,
    pub reason: BlockReason,
}

impl IpBlock {
    pub fn new(now: DateTime<Utc>, duration: Duration, reason: BlockReason) -> Self {
        Self {
            blocked_at: now,
            blocked_until: now + duration,
            reason,
        }
    }

    /// Blocked iff `now < blocked_until`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.blocked_until
    }

    pub fn remaining_ms(&self, now: DateTime<Utc>) -> u64 {
        (self.blocked_until - now).num_milliseconds().max(0) as u64
    }
}
