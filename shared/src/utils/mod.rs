//! Common utility functions

pub mod client;
pub mod phone;

// Re-export commonly used utilities
pub use client::*;
pub use phone::*;
