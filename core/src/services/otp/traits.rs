//! Delivery channel integration

use async_trait::async_trait;

use crate::domain::value_objects::{Identifier, PlainCode};

/// Out-of-band channel that carries a code to its owner
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Deliver a code, returning the provider's message ID
    async fn send_code(&self, identifier: &Identifier, code: &PlainCode) -> Result<String, String>;

    /// Short name used in logs
    fn channel_name(&self) -> &'static str;
}
