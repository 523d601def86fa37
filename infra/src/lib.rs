//! # Infrastructure Layer
//!
//! Concrete delivery channels for OtpGuard verification codes. The core
//! store never calls these directly; the `VerificationService` receives one
//! as its `DeliveryChannel`.
//!
//! ## Providers
//!
//! - **mock**: logs a masked notice and keeps codes in memory (development, tests)
//! - **whatsapp**: WhatsApp Cloud API authentication template

// Re-export core types for convenience
pub use og_core::errors::*;

/// Delivery provider configuration
pub mod config;

/// Delivery channel implementations
pub mod delivery;

pub use config::{DeliveryConfig, DeliveryProvider, WhatsAppConfig};
pub use delivery::{create_delivery_channel, MockDeliveryChannel, WhatsAppDeliveryChannel};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delivery provider rejected or failed the message
    #[error("Delivery error: {0}")]
    Delivery(String),
}
