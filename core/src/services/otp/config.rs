//! Configuration for the OTP security store

use chrono::Duration;
use og_shared::OtpSettings;

use crate::domain::entities::{CODE_LENGTH, DEFAULT_TTL_MS, MAX_ATTEMPTS};
use crate::errors::DomainError;

/// Validated limits the store runs with
#[derive(Debug, Clone)]
pub struct OtpSecurityConfig {
    /// Lifetime of an issued code
    pub otp_ttl: Duration,
    /// Verification attempts allowed per code
    pub max_attempts: u32,
    /// Issuance counting window per identifier
    pub rate_window: Duration,
    /// Issuance requests allowed per window
    pub max_requests_per_window: u32,
    /// Block applied to an IP that exceeds the issuance cap
    pub ip_block_duration: Duration,
    /// Block applied to an IP that exhausts a code's attempts
    pub attempt_block_duration: Duration,
    /// Digits per generated code
    pub code_length: u32,
    /// Period of the background eviction sweep
    pub sweep_interval: std::time::Duration,
    /// Whether the diagnostics surface answers
    pub debug_introspection: bool,
    /// Country code prepended to bare national numbers
    pub default_country_code: Option<String>,
}

impl Default for OtpSecurityConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::milliseconds(DEFAULT_TTL_MS),
            max_attempts: MAX_ATTEMPTS,
            rate_window: Duration::minutes(15),
            max_requests_per_window: 3,
            ip_block_duration: Duration::minutes(60),
            attempt_block_duration: Duration::minutes(30),
            code_length: CODE_LENGTH,
            sweep_interval: std::time::Duration::from_secs(300),
            debug_introspection: false,
            default_country_code: None,
        }
    }
}

impl TryFrom<&OtpSettings> for OtpSecurityConfig {
    type Error = DomainError;

    fn try_from(settings: &OtpSettings) -> Result<Self, Self::Error> {
        settings.validate()?;

        // validate() caps every duration at one year
        let ms = |value: u64| Duration::milliseconds(value as i64);

        Ok(Self {
            otp_ttl: ms(settings.otp_ttl_ms),
            max_attempts: settings.max_attempts,
            rate_window: ms(settings.rate_window_ms),
            max_requests_per_window: settings.max_requests_per_window,
            ip_block_duration: ms(settings.ip_block_ms),
            attempt_block_duration: ms(settings.attempt_block_ms),
            code_length: settings.code_length,
            sweep_interval: std::time::Duration::from_millis(settings.sweep_interval_ms),
            debug_introspection: settings.otp_debug_introspection,
            default_country_code: settings.default_country_code.clone(),
        })
    }
}
