//! Cryptographically secure numeric code generation

use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::value_objects::PlainCode;
use crate::errors::{DomainError, DomainResult};

/// Generates fixed-width decimal codes from the OS CSPRNG
///
/// Codes fall in `[10^(n-1), 10^n - 1]`, so a 6-digit generator yields
/// 100000..=999999. Rejection sampling keeps every value equally likely.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: u32,
}

impl CodeGenerator {
    /// `length` must already be validated (4..=12)
    pub fn new(length: u32) -> Self {
        Self { length }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Inclusive bounds of generated values
    pub fn range(&self) -> (u64, u64) {
        let low = 10u64.pow(self.length - 1);
        (low, low * 10 - 1)
    }

    /// Generate a code using `OsRng`
    pub fn generate(&self) -> DomainResult<PlainCode> {
        self.generate_with(&mut OsRng)
    }

    /// Generate a code from the given entropy source
    ///
    /// A failing source is reported as `EntropyUnavailable`; there is no
    /// fallback generator.
    pub fn generate_with<R: RngCore + ?Sized>(&self, rng: &mut R) -> DomainResult<PlainCode> {
        let (low, high) = self.range();
        let span = high - low + 1;
        // Largest multiple of span that fits; draws at or above it are rejected
        let zone = u64::MAX - (u64::MAX % span);

        loop {
            let mut bytes = [0u8; 8];
            rng.try_fill_bytes(&mut bytes).map_err(|e| {
                tracing::error!(
                    event = "entropy_unavailable",
                    error = %e,
                    "Secure random source failed during code generation"
                );
                DomainError::EntropyUnavailable {
                    message: e.to_string(),
                }
            })?;

            let value = u64::from_le_bytes(bytes);
            if value < zone {
                return Ok(PlainCode::new((low + value % span).to_string()));
            }
        }
    }
}
