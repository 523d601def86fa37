//! Admission-control errors raised before a code is issued or checked

use thiserror::Error;

use crate::domain::entities::BlockReason;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;

fn ceil_minutes(remaining_ms: &u64) -> u64 {
    remaining_ms.div_ceil(MS_PER_MINUTE)
}

/// Request refused by the IP block registry or the rate limiter
///
/// Terminal for the current request; callers surface the remaining time and
/// never retry automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("IP blocked ({reason}). Please try again in {} minutes", ceil_minutes(.remaining_ms))]
    IpBlocked { reason: BlockReason, remaining_ms: u64 },

    #[error("Rate limit exceeded. Please try again in {} minutes", ceil_minutes(.remaining_ms))]
    RateLimited { remaining_ms: u64 },
}

impl AdmissionError {
    /// Milliseconds until the caller may try again
    pub fn remaining_ms(&self) -> u64 {
        match self {
            AdmissionError::IpBlocked { remaining_ms, .. } => *remaining_ms,
            AdmissionError::RateLimited { remaining_ms } => *remaining_ms,
        }
    }

    /// Remaining time rounded up to whole seconds (`Retry-After`)
    pub fn retry_after_seconds(&self) -> u64 {
        self.remaining_ms().div_ceil(MS_PER_SECOND)
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AdmissionError::IpBlocked { .. } => "IP_BLOCKED",
            AdmissionError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
        }
    }
}
