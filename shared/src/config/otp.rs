//! OTP security configuration knobs
//!
//! Every knob is read from a process environment variable of the same name
//! (upper-cased). Missing variables fall back to the documented default; a
//! variable that is present but cannot be parsed is an error.

use config::{Config, Environment as EnvironmentSource};
use serde::{Deserialize, Serialize};

use super::SettingsError;

/// Smallest supported code length
pub const MIN_CODE_LENGTH: u32 = 4;

/// Largest supported code length
pub const MAX_CODE_LENGTH: u32 = 12;

/// Upper bound for any duration knob (one year)
pub const MAX_DURATION_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Tunable limits for OTP issuance and verification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpSettings {
    /// How long an issued code stays valid (`OTP_TTL_MS`)
    #[serde(default = "default_otp_ttl_ms")]
    pub otp_ttl_ms: u64,

    /// Verification attempts allowed per code (`MAX_ATTEMPTS`)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Issuance counting window per identifier (`RATE_WINDOW_MS`)
    #[serde(default = "default_rate_window_ms")]
    pub rate_window_ms: u64,

    /// Issuance requests allowed per window (`MAX_REQUESTS_PER_WINDOW`)
    #[serde(default = "default_max_requests_per_window")]
    pub max_requests_per_window: u32,

    /// IP block duration after the issuance cap is exceeded (`IP_BLOCK_MS`)
    #[serde(default = "default_ip_block_ms")]
    pub ip_block_ms: u64,

    /// IP block duration after the attempt ceiling is hit (`ATTEMPT_BLOCK_MS`)
    #[serde(default = "default_attempt_block_ms")]
    pub attempt_block_ms: u64,

    /// Number of digits in a generated code (`CODE_LENGTH`)
    #[serde(default = "default_code_length")]
    pub code_length: u32,

    /// Period of the background eviction sweep (`SWEEP_INTERVAL_MS`)
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,

    /// Enables the read-only diagnostics surface (`OTP_DEBUG_INTROSPECTION`)
    #[serde(default)]
    pub otp_debug_introspection: bool,

    /// Country code prepended to 10-digit national numbers (`DEFAULT_COUNTRY_CODE`)
    #[serde(default)]
    pub default_country_code: Option<String>,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            otp_ttl_ms: default_otp_ttl_ms(),
            max_attempts: default_max_attempts(),
            rate_window_ms: default_rate_window_ms(),
            max_requests_per_window: default_max_requests_per_window(),
            ip_block_ms: default_ip_block_ms(),
            attempt_block_ms: default_attempt_block_ms(),
            code_length: default_code_length(),
            sweep_interval_ms: default_sweep_interval_ms(),
            otp_debug_introspection: false,
            default_country_code: None,
        }
    }
}

impl OtpSettings {
    /// Load settings from the process environment and validate them
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings: Self = Config::builder()
            .add_source(EnvironmentSource::default().try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would disable a protection or overflow the generator
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive_durations = [
            ("OTP_TTL_MS", self.otp_ttl_ms),
            ("RATE_WINDOW_MS", self.rate_window_ms),
            ("IP_BLOCK_MS", self.ip_block_ms),
            ("ATTEMPT_BLOCK_MS", self.attempt_block_ms),
            ("SWEEP_INTERVAL_MS", self.sweep_interval_ms),
        ];
        for (field, value) in positive_durations {
            if value == 0 {
                return Err(SettingsError::invalid(field, "must be greater than zero"));
            }
            if value > MAX_DURATION_MS {
                return Err(SettingsError::invalid(field, "must not exceed one year"));
            }
        }

        if self.max_attempts == 0 {
            return Err(SettingsError::invalid("MAX_ATTEMPTS", "must be at least 1"));
        }
        if self.max_requests_per_window == 0 {
            return Err(SettingsError::invalid(
                "MAX_REQUESTS_PER_WINDOW",
                "must be at least 1",
            ));
        }
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            return Err(SettingsError::invalid(
                "CODE_LENGTH",
                format!("must be between {} and {}", MIN_CODE_LENGTH, MAX_CODE_LENGTH),
            ));
        }
        if let Some(code) = &self.default_country_code {
            if code.is_empty() || code.len() > 3 || !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(SettingsError::invalid(
                    "DEFAULT_COUNTRY_CODE",
                    "must be 1 to 3 digits",
                ));
            }
        }

        Ok(())
    }
}

fn default_otp_ttl_ms() -> u64 {
    300_000 // 5 minutes
}

fn default_max_attempts() -> u32 {
    3
}

fn default_rate_window_ms() -> u64 {
    900_000 // 15 minutes
}

fn default_max_requests_per_window() -> u32 {
    3
}

fn default_ip_block_ms() -> u64 {
    3_600_000 // 60 minutes
}

fn default_attempt_block_ms() -> u64 {
    1_800_000 // 30 minutes
}

fn default_code_length() -> u32 {
    6
}

fn default_sweep_interval_ms() -> u64 {
    300_000 // 5 minutes
}
