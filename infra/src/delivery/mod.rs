//! Delivery channels for verification codes

use std::sync::Arc;

use og_core::services::DeliveryChannel;

use crate::config::{DeliveryConfig, DeliveryProvider};
use crate::InfrastructureError;

pub mod mock;
pub mod whatsapp;

pub use mock::MockDeliveryChannel;
pub use whatsapp::WhatsAppDeliveryChannel;

#[cfg(test)]
mod tests;

/// Create the delivery channel selected by configuration
///
/// A WhatsApp provider without credentials is an error; there is no silent
/// fallback to the mock channel. The mock channel is refused in production.
pub fn create_delivery_channel(
    config: &DeliveryConfig,
) -> Result<Arc<dyn DeliveryChannel>, InfrastructureError> {
    match config.provider {
        DeliveryProvider::Mock if config.environment.is_production() => {
            Err(InfrastructureError::Config(
                "Mock delivery provider is not allowed in production".to_string(),
            ))
        }
        DeliveryProvider::Mock => {
            if config.environment.is_development() {
                tracing::info!(
                    provider = "mock",
                    environment = %config.environment,
                    "Using mock delivery channel"
                );
            } else {
                tracing::warn!(
                    provider = "mock",
                    environment = %config.environment,
                    "Using mock delivery channel; codes are not sent to users"
                );
            }
            Ok(Arc::new(MockDeliveryChannel::new()))
        }
        DeliveryProvider::WhatsApp => {
            let whatsapp = config.whatsapp.clone().ok_or_else(|| {
                InfrastructureError::Config("WhatsApp provider selected without credentials".to_string())
            })?;
            Ok(Arc::new(WhatsAppDeliveryChannel::new(whatsapp)?))
        }
    }
}
