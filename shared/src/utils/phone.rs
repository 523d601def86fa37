//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164 digits without the leading plus
static E164_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[1-9]\d{1,14}$").expect("E.164 pattern is valid")
});

/// Length of a national number that still needs a country code
pub const NATIONAL_NUMBER_LENGTH: usize = 10;

/// Normalize a phone number to its digits only
///
/// `"+1 555-0100"` and `"15550100"` both normalize to `"15550100"`.
pub fn normalize_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Prefix a bare 10-digit national number with a default country code
pub fn with_default_country_code(phone: &str, country_code: &str) -> String {
    let digits = normalize_phone_number(phone);
    if digits.len() == NATIONAL_NUMBER_LENGTH {
        format!("{}{}", country_code, digits)
    } else {
        digits
    }
}

/// Check whether the digits of a phone number form an E.164 number
pub fn is_e164_digits(phone: &str) -> bool {
    E164_DIGITS_REGEX.is_match(&normalize_phone_number(phone))
}

/// Check if a phone number is deliverable (10 to 15 digits)
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = normalize_phone_number(phone);
    (10..=15).contains(&digits.len())
}

/// Mask a phone number for display (e.g., 155****0100)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+1 555-0100"), "15550100");
        assert_eq!(normalize_phone_number("15550100"), "15550100");
        assert_eq!(normalize_phone_number("(91) 98765-43210"), "919876543210");
    }

    #[test]
    fn test_with_default_country_code() {
        assert_eq!(with_default_country_code("9876543210", "91"), "919876543210");
        assert_eq!(with_default_country_code("+91 98765 43210", "91"), "919876543210");
        assert_eq!(with_default_country_code("15550100", "91"), "15550100");
    }

    #[test]
    fn test_is_e164_digits() {
        assert!(is_e164_digits("15550100"));
        assert!(is_e164_digits("+14155552671"));
        assert!(!is_e164_digits("0123456789"));
        assert!(!is_e164_digits("1"));
        assert!(!is_e164_digits("1234567890123456"));
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+91 98765 43210"));
        assert!(is_valid_phone("9876543210"));
        assert!(!is_valid_phone("15550100"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("15550100"), "155****0100");
        assert_eq!(mask_phone_number("+919876543210"), "919****3210");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
