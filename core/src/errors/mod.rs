//! Domain-specific error types and error handling.

mod types;


pub use types::AdmissionError;

use og_shared::SettingsError;
use thiserror::Error;

/// Core domain errors
///
/// Verification results (not found, expired, mismatch, attempts exceeded)
/// are ordinary outcomes and never appear here.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Secure random source unavailable: {message}")]
    EntropyUnavailable { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] SettingsError),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Failed to deliver verification code: {message}")]
    Delivery { message: String },

    // Bridge to admission-control errors
    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

impl DomainError {
    /// Stable machine-readable code for the transport layer
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::EntropyUnavailable { .. } => "ENTROPY_UNAVAILABLE",
            DomainError::Configuration(_) => "CONFIGURATION_ERROR",
            DomainError::Unauthorized => "UNAUTHORIZED",
            DomainError::Delivery { .. } => "DELIVERY_FAILURE",
            DomainError::Admission(err) => err.error_code(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
