//! OTP record entity: one live hashed code per identifier.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_objects::{CodeDigest, DeviceId, Identifier};

/// Default number of verification attempts allowed per code
pub const MAX_ATTEMPTS: u32 = 3;

/// Default number of digits in a code
pub const CODE_LENGTH: u32 = 6;

/// Default lifetime of an issued code (5 minutes)
pub const DEFAULT_TTL_MS: i64 = 300_000;

/// Stored state of an issued, not yet consumed code
///
/// The plaintext is never kept; `source_ip`, `device_id` and `user_agent`
/// describe the issuing client and are only compared for logging.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    /// Identifier this code was issued for
    pub identifier: Identifier,

    /// SHA-256 of the issued code
    pub code_hash: CodeDigest,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Verification attempts made so far
    pub attempts: u32,

    /// IP that requested the code
    pub source_ip: String,

    /// Fingerprint of the requesting device
    pub device_id: DeviceId,

    /// User agent that requested the code
    pub user_agent: String,
}

impl OtpRecord {
    /// Create a fresh record with no attempts
    pub fn new(
        identifier: Identifier,
        code_hash: CodeDigest,
        issued_at: DateTime<Utc>,
        source_ip: String,
        device_id: DeviceId,
        user_agent: String,
    ) -> Self {
        Self {
            identifier,
            code_hash,
            issued_at,
            attempts: 0,
            source_ip,
            device_id,
            user_agent,
        }
    }

    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        self.issued_at + ttl
    }

    /// A record expires once more than `ttl` has passed since issuance
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now > self.expires_at(ttl)
    }

    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Whether the record may still be verified
    pub fn is_valid(&self, now: DateTime<Utc>, ttl: Duration, max_attempts: u32) -> bool {
        !self.is_expired(now, ttl) && !self.is_exhausted(max_attempts)
    }

    /// Count one verification attempt and return the new total
    pub fn record_attempt(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }
}
