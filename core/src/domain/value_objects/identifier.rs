//! Normalized OTP identifier (phone number key)

use std::str::FromStr;

use og_shared::phone;
use serde::Serialize;

use crate::errors::{DomainError, DomainResult};

/// Canonical key an OTP is bound to: E.164 digits without the plus
///
/// The store only accepts this type, so two spellings of one number
/// (`"+1 555-0100"`, `"15550100"`) always map to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Normalize and validate a raw phone number
    pub fn parse(raw: &str) -> DomainResult<Self> {
        Self::parse_with_country_code(raw, None)
    }

    /// Normalize a raw phone number, prefixing bare 10-digit national numbers
    pub fn parse_with_country_code(raw: &str, country_code: Option<&str>) -> DomainResult<Self> {
        let digits = match country_code {
            Some(code) => phone::with_default_country_code(raw, code),
            None => phone::normalize_phone_number(raw),
        };

        if !phone::is_e164_digits(&digits) {
            return Err(DomainError::Validation {
                message: format!(
                    "Invalid phone number format: {}",
                    phone::mask_phone_number(raw)
                ),
            });
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form safe for logs and diagnostics
    pub fn masked(&self) -> String {
        phone::mask_phone_number(&self.0)
    }
}

impl FromStr for Identifier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
