//! # OtpGuard Core
//!
//! Domain layer for one-time passcode issuance and verification: entities,
//! the in-memory OTP security store with its rate limiting and IP blocking,
//! the background eviction sweep, and the verification orchestrator.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
