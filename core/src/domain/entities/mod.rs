//! Domain entities held by the OTP security store.

pub mod ip_block;
pub mod otp_record;
pub mod rate_window;


// Re-export commonly used types
pub use ip_block::{BlockReason, IpBlock};
pub use otp_record::{OtpRecord, CODE_LENGTH, DEFAULT_TTL_MS, MAX_ATTEMPTS};
pub use rate_window::RateLimitWindow;
