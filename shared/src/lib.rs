//! Shared utilities and common types for OtpGuard
//!
//! This crate provides common functionality used across all workspace members:
//! - Configuration types and environment loading
//! - Tracing initialisation
//! - Utility functions (phone normalization, client metadata)

pub mod config;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, LogFormat, LoggingConfig, OtpSettings, SettingsError};
pub use telemetry::{init_tracing, TelemetryError};
pub use utils::{client, phone};
