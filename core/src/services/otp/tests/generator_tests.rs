//! Tests for code generation

use std::collections::HashSet;

use rand::rngs::mock::StepRng;
use rand::RngCore;

use crate::errors::DomainError;
use crate::services::otp::generator::CodeGenerator;

struct BrokenRng;

impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 {
        unreachable!("generator only uses try_fill_bytes")
    }

    fn next_u64(&mut self) -> u64 {
        unreachable!("generator only uses try_fill_bytes")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        unreachable!("generator only uses try_fill_bytes")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy pool exhausted",
        )))
    }
}

#[test]
fn test_six_digit_codes_in_range() {
    let generator = CodeGenerator::new(6);
    assert_eq!(generator.range(), (100_000, 999_999));

    for _ in 0..1_000 {
        let code = generator.generate().unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.expose().chars().all(|c| c.is_ascii_digit()));

        let value: u64 = code.expose().parse().unwrap();
        assert!((100_000..=999_999).contains(&value));
    }
}

#[test]
fn test_range_for_other_lengths() {
    assert_eq!(CodeGenerator::new(4).range(), (1_000, 9_999));
    assert_eq!(CodeGenerator::new(12).range(), (100_000_000_000, 999_999_999_999));

    let code = CodeGenerator::new(12).generate().unwrap();
    assert_eq!(code.len(), 12);
    assert!(!code.expose().starts_with('0'));
}

#[test]
fn test_deterministic_source_maps_to_range() {
    let generator = CodeGenerator::new(6);

    let code = generator.generate_with(&mut StepRng::new(0, 0)).unwrap();
    assert_eq!(code.expose(), "100000");

    let code = generator.generate_with(&mut StepRng::new(382_913, 0)).unwrap();
    assert_eq!(code.expose(), "482913");
}

#[test]
fn test_draws_above_zone_are_rejected() {
    let generator = CodeGenerator::new(6);

    // u64::MAX falls in the biased tail; the next draw wraps to 0
    let code = generator
        .generate_with(&mut StepRng::new(u64::MAX, 1))
        .unwrap();
    assert_eq!(code.expose(), "100000");
}

#[test]
fn test_failing_entropy_source_is_an_error() {
    let result = CodeGenerator::new(6).generate_with(&mut BrokenRng);

    match result {
        Err(DomainError::EntropyUnavailable { message }) => {
            assert!(message.contains("entropy pool exhausted"));
        }
        other => panic!("expected EntropyUnavailable, got {:?}", other),
    }
}

#[test]
fn test_codes_are_not_repeated_in_small_sample() {
    let generator = CodeGenerator::new(6);
    let codes: HashSet<String> = (0..200)
        .map(|_| generator.generate().unwrap().expose().to_string())
        .collect();

    // Birthday bound for 200 draws over 900000 values keeps duplicates rare
    assert!(codes.len() >= 195);
}

#[test]
fn test_digit_distribution_is_uniform() {
    let generator = CodeGenerator::new(6);
    let samples = 90_000usize;
    let mut leading = [0usize; 10];
    let mut trailing = [0usize; 10];

    for _ in 0..samples {
        let code = generator.generate().unwrap();
        let bytes = code.expose().as_bytes();
        leading[(bytes[0] - b'0') as usize] += 1;
        trailing[(bytes[bytes.len() - 1] - b'0') as usize] += 1;
    }

    assert_eq!(leading[0], 0);

    let chi_square = |counts: &[usize], expected: f64| -> f64 {
        counts
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum()
    };

    // Critical values far beyond p = 0.0001 for 8 and 9 degrees of freedom
    let leading_stat = chi_square(&leading[1..], samples as f64 / 9.0);
    let trailing_stat = chi_square(&trailing, samples as f64 / 10.0);
    assert!(leading_stat < 45.0, "leading digit chi-square {}", leading_stat);
    assert!(trailing_stat < 45.0, "trailing digit chi-square {}", trailing_stat);
}

#[test]
fn test_plain_code_debug_is_redacted() {
    let code = CodeGenerator::new(6)
        .generate_with(&mut StepRng::new(382_913, 0))
        .unwrap();
    let debug = format!("{:?}", code);

    assert!(!debug.contains("482913"));
    assert!(debug.contains("******"));
}
