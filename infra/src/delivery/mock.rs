//! Mock delivery channel for development and testing
//!
//! Nothing leaves the process. Codes are kept per identifier so tests can
//! complete a verification round trip.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use og_core::domain::{Identifier, PlainCode};
use og_core::services::DeliveryChannel;
use og_shared::phone::{is_valid_phone, mask_phone_number};
use tracing::{info, warn};
use uuid::Uuid;

/// Most identifiers whose last code is retained
pub const MAX_RETAINED_CODES: usize = 1_000;

/// In-memory delivery channel
///
/// - Generates `mock_<uuid>` message IDs
/// - Counts delivered messages
/// - Can simulate provider failure
/// - Keeps the last code for at most `MAX_RETAINED_CODES` identifiers
#[derive(Default)]
pub struct MockDeliveryChannel {
    message_count: AtomicU64,
    simulate_failure: AtomicBool,
    last_codes: Mutex<HashMap<String, String>>,
}

impl MockDeliveryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a channel that fails every delivery
    pub fn failing() -> Self {
        let channel = Self::new();
        channel.set_simulate_failure(true);
        channel
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Number of messages delivered successfully
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Number of identifiers with a retained code
    pub fn retained_codes(&self) -> usize {
        self.last_codes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Most recent code delivered to an identifier
    pub fn last_code_for(&self, identifier: &str) -> Option<String> {
        self.last_codes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(identifier)
            .cloned()
    }
}

#[async_trait]
impl DeliveryChannel for MockDeliveryChannel {
    async fn send_code(&self, identifier: &Identifier, code: &PlainCode) -> Result<String, String> {
        let masked_phone = mask_phone_number(identifier.as_str());

        if !is_valid_phone(identifier.as_str()) {
            return Err(format!("Invalid phone number format: {}", masked_phone));
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = "mock",
                phone = %masked_phone,
                "Mock delivery channel simulating failure"
            );
            return Err("Simulated delivery failure".to_string());
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut last_codes = self.last_codes.lock().unwrap_or_else(|e| e.into_inner());
            if last_codes.len() >= MAX_RETAINED_CODES && !last_codes.contains_key(identifier.as_str()) {
                // Evict an arbitrary entry
                if let Some(evicted) = last_codes.keys().next().cloned() {
                    last_codes.remove(&evicted);
                }
            }
            last_codes.insert(identifier.as_str().to_string(), code.expose().to_string());
        }

        info!(
            target: "delivery",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            message_number = count,
            "Verification code delivered (mock)"
        );

        Ok(message_id)
    }

    fn channel_name(&self) -> &'static str {
        "mock"
    }
}
