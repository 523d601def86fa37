//! OTP security store and the services built on it
//!
//! Issuance and verification state lives in three in-memory maps (records,
//! rate windows, IP blocks), each behind its own mutex. The
//! `VerificationService` composes them into the request-code and
//! submit-code flows; the `EvictionScheduler` keeps them bounded.

pub mod block_registry;
pub mod clock;
pub mod config;
pub mod fingerprint;
pub mod generator;
pub mod hasher;
pub mod rate_limiter;
pub mod record_store;
pub mod service;
pub mod store;
pub mod sweeper;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use block_registry::IpBlockRegistry;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OtpSecurityConfig;
pub use fingerprint::{device_fingerprint, DEVICE_ID_LENGTH};
pub use generator::CodeGenerator;
pub use hasher::CodeHasher;
pub use rate_limiter::RateLimiter;
pub use record_store::OtpRecordStore;
pub use service::VerificationService;
pub use store::OtpSecurityStore;
pub use sweeper::{EvictionScheduler, SweepResult};
pub use traits::DeliveryChannel;
pub use types::{
    BlockSnapshot, BlockStatus, RateDecision, RecordSnapshot, SecurityStatus, SendCodeResult,
    StoreStats, VerifyCodeResult, VerifyOutcome, WindowSnapshot,
};

/// Acquire a map lock, recovering from poisoning
///
/// Entries are re-validated against the clock on every read.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
