//! Unit tests for identifier normalization

use crate::domain::value_objects::{Identifier, PlainCode};
use crate::errors::DomainError;

#[test]
fn test_equivalent_spellings_collide() {
    let formatted = Identifier::parse("+1 555-0100").unwrap();
    let digits = Identifier::parse("15550100").unwrap();
    assert_eq!(formatted, digits);
    assert_eq!(digits.as_str(), "15550100");
}

#[test]
fn test_invalid_identifiers_rejected() {
    for raw in ["", "abc", "0123456", "1", "1234567890123456"] {
        match Identifier::parse(raw) {
            Err(DomainError::Validation { message }) => {
                assert!(message.contains("Invalid phone number format"));
            }
            other => panic!("expected validation error for {raw:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_default_country_code_applies_to_national_numbers() {
    let national = Identifier::parse_with_country_code("98765 43210", Some("91")).unwrap();
    let international = Identifier::parse("+91 98765 43210").unwrap();
    assert_eq!(national, international);

    let short = Identifier::parse_with_country_code("15550100", Some("91")).unwrap();
    assert_eq!(short.as_str(), "15550100");
}

#[test]
fn test_masked_and_parse_via_from_str() {
    let id: Identifier = "+1 555-0100".parse().unwrap();
    assert_eq!(id.masked(), "155****0100");
}

#[test]
fn test_plain_code_debug_is_redacted() {
    let code = PlainCode::new("482913".to_string());
    let rendered = format!("{:?}", code);
    assert!(!rendered.contains("482913"));
    assert_eq!(code.expose(), "482913");
    assert_eq!(code.len(), 6);
}
