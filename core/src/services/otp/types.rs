//! Result and snapshot types for the OTP security store

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::BlockReason;

/// Outcome of checking a candidate code against the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// Code matched; the record has been consumed
    Success,
    /// No live record for the identifier
    NotFound,
    /// Record outlived its TTL and was removed
    Expired,
    /// Attempt ceiling reached; record removed and the IP blocked
    AttemptsExceeded { blocked_ms: u64 },
    /// Code did not match; the attempt was counted
    Mismatch { remaining_attempts: u32 },
}

impl VerifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Success)
    }

    pub fn message(&self) -> &'static str {
        match self {
            VerifyOutcome::Success => "OTP verified successfully",
            VerifyOutcome::NotFound => "OTP not found or expired",
            VerifyOutcome::Expired => "OTP has expired",
            VerifyOutcome::AttemptsExceeded { .. } => "Maximum verification attempts exceeded",
            VerifyOutcome::Mismatch { .. } => "Invalid OTP",
        }
    }
}

/// Rate limiter admission decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    Allowed {
        request_count: u32,
        window_resets_at: DateTime<Utc>,
    },
    Denied {
        reason: BlockReason,
        block_remaining_ms: u64,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Answer of the IP block registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStatus {
    pub blocked: bool,
    pub reason: Option<BlockReason>,
    pub remaining_ms: Option<u64>,
}

impl BlockStatus {
    pub fn unblocked() -> Self {
        Self {
            blocked: false,
            reason: None,
            remaining_ms: None,
        }
    }

    pub fn blocked(reason: BlockReason, remaining_ms: u64) -> Self {
        Self {
            blocked: true,
            reason: Some(reason),
            remaining_ms: Some(remaining_ms),
        }
    }
}

/// Result of sending a verification code
#[derive(Debug, Clone)]
pub struct SendCodeResult {
    /// Message ID from the delivery channel
    pub message_id: String,
    /// Masked phone number the code was sent to
    pub masked_phone: String,
    /// When the issued code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Issuance requests left in the current window
    pub requests_remaining: u32,
}

/// Result of verifying a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCodeResult {
    pub outcome: VerifyOutcome,
    /// Attempts left on the code (after a mismatch)
    pub remaining_attempts: Option<u32>,
    pub message: String,
}

impl VerifyCodeResult {
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }
}

impl From<VerifyOutcome> for VerifyCodeResult {
    fn from(outcome: VerifyOutcome) -> Self {
        let remaining_attempts = match outcome {
            VerifyOutcome::Mismatch { remaining_attempts } => Some(remaining_attempts),
            _ => None,
        };
        Self {
            outcome,
            remaining_attempts,
            message: outcome.message().to_string(),
        }
    }
}

/// Diagnostics view of a stored record (no code material)
#[derive(Debug, Clone, Serialize)]
pub struct RecordSnapshot {
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
    pub remaining_attempts: u32,
    pub expired: bool,
    pub source_ip: String,
    pub device_id: String,
}

/// Diagnostics view of a rate-limit window
#[derive(Debug, Clone, Serialize)]
pub struct WindowSnapshot {
    pub window_start: DateTime<Utc>,
    pub window_resets_at: DateTime<Utc>,
    pub request_count: u32,
    pub remaining_requests: u32,
    pub last_ip: String,
}

/// Diagnostics view of an IP block
#[derive(Debug, Clone, Serialize)]
pub struct BlockSnapshot {
    pub ip: String,
    pub reason: BlockReason,
    pub blocked_at: DateTime<Utc>,
    pub blocked_until: DateTime<Utc>,
    pub remaining_ms: u64,
    pub active: bool,
}

/// Read-only security status for one identifier and client IP
#[derive(Debug, Clone, Serialize)]
pub struct SecurityStatus {
    pub identifier: String,
    pub checked_at: DateTime<Utc>,
    pub otp: Option<RecordSnapshot>,
    pub rate_limit: Option<WindowSnapshot>,
    pub ip_block: Option<BlockSnapshot>,
}

/// Entry counts per map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub active_records: usize,
    pub rate_windows: usize,
    pub blocked_ips: usize,
}
