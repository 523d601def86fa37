//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP issuance, verification and abuse-control limits

pub mod environment;
pub mod otp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpSettings;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl SettingsError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// OTP limits
    #[serde(default)]
    pub otp: OtpSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            logging: LoggingConfig::for_environment(env),
            otp: OtpSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment
    ///
    /// Reads the environment-specific `.env` file first (then a plain `.env`)
    /// when present. Diagnostics stay disabled in production regardless of
    /// `OTP_DEBUG_INTROSPECTION`.
    pub fn from_env() -> Result<Self, SettingsError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        let mut otp = OtpSettings::from_env()?;
        if environment.is_production() && otp.otp_debug_introspection {
            tracing::warn!(
                event = "introspection_disabled",
                "OTP_DEBUG_INTROSPECTION ignored in production"
            );
            otp.otp_debug_introspection = false;
        }

        Ok(Self {
            environment,
            logging: LoggingConfig::for_environment(environment),
            otp,
        })
    }
}
