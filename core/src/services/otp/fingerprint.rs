//! Device fingerprinting from client metadata
//!
//! The fingerprint is a soft signal: a mismatch between issuance and
//! verification is logged and never blocks, since mobile clients change IP
//! mid-flow.

use sha2::{Digest, Sha256};

use crate::domain::value_objects::DeviceId;

/// Hex characters kept from the digest
pub const DEVICE_ID_LENGTH: usize = 16;

/// SHA-256 of `user_agent || ip`, hex-encoded and truncated
pub fn device_fingerprint(user_agent: &str, ip: &str) -> DeviceId {
    let mut hasher = Sha256::new();
    hasher.update(user_agent.as_bytes());
    hasher.update(ip.as_bytes());
    let mut encoded = hex::encode(hasher.finalize());
    encoded.truncate(DEVICE_ID_LENGTH);
    DeviceId::new(encoded)
}
