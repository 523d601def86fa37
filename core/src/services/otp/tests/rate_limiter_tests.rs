//! Tests for issuance rate limiting

use chrono::Duration;

use crate::domain::entities::BlockReason;
use crate::domain::value_objects::Identifier;
use crate::services::otp::clock::Clock;
use crate::services::otp::config::OtpSecurityConfig;
use crate::services::otp::types::RateDecision;

use super::manual_store;

const IP: &str = "203.0.113.7";

fn phone() -> Identifier {
    Identifier::parse("15550100").unwrap()
}

#[test]
fn test_first_request_opens_window() {
    let (store, clock) = manual_store(OtpSecurityConfig::default());

    match store.check_and_record(&phone(), IP) {
        RateDecision::Allowed {
            request_count,
            window_resets_at,
        } => {
            assert_eq!(request_count, 1);
            assert_eq!(window_resets_at, clock.now() + Duration::minutes(15));
        }
        other => panic!("expected Allowed, got {:?}", other),
    }
}

#[test]
fn test_cap_denies_and_blocks_requesting_ip() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    let phone = phone();

    for expected in 1..=3 {
        match store.check_and_record(&phone, IP) {
            RateDecision::Allowed { request_count, .. } => assert_eq!(request_count, expected),
            other => panic!("expected Allowed, got {:?}", other),
        }
    }

    let decision = store.check_and_record(&phone, IP);
    assert_eq!(
        decision,
        RateDecision::Denied {
            reason: BlockReason::RateLimitExceeded,
            block_remaining_ms: 3_600_000,
        }
    );

    let status = store.is_blocked(IP);
    assert!(status.blocked);
    assert_eq!(status.reason, Some(BlockReason::RateLimitExceeded));
}

#[test]
fn test_denied_request_does_not_grow_count() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    let phone = phone();

    for _ in 0..5 {
        store.check_and_record(&phone, IP);
    }

    let snapshot = store.rate_limiter().snapshot(&phone).unwrap();
    assert_eq!(snapshot.request_count, 3);
    assert_eq!(snapshot.remaining_requests, 0);
}

#[test]
fn test_window_restarts_after_elapsing() {
    let (store, clock) = manual_store(OtpSecurityConfig::default());
    let phone = phone();

    for _ in 0..3 {
        assert!(store.check_and_record(&phone, IP).is_allowed());
    }

    clock.advance(Duration::minutes(15) + Duration::milliseconds(1));
    match store.check_and_record(&phone, "203.0.113.8") {
        RateDecision::Allowed { request_count, .. } => assert_eq!(request_count, 1),
        other => panic!("expected Allowed, got {:?}", other),
    }
    assert_eq!(store.rate_limiter().snapshot(&phone).unwrap().last_ip, "203.0.113.8");
}

#[test]
fn test_windows_are_per_identifier() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    let first = phone();
    let second = Identifier::parse("15550101").unwrap();

    for _ in 0..3 {
        assert!(store.check_and_record(&first, IP).is_allowed());
    }
    assert!(store.check_and_record(&second, "203.0.113.9").is_allowed());
    assert_eq!(store.rate_limiter().remaining_requests(&second), 2);
    assert_eq!(store.rate_limiter().remaining_requests(&first), 0);
}

#[test]
fn test_purge_stale_windows() {
    let (store, clock) = manual_store(OtpSecurityConfig::default());
    store.check_and_record(&phone(), IP);
    clock.advance(Duration::minutes(5));
    store.check_and_record(&Identifier::parse("15550101").unwrap(), IP);

    clock.advance(Duration::minutes(10) + Duration::milliseconds(1));
    assert_eq!(store.rate_limiter().purge_stale(), 1);
    assert_eq!(store.rate_limiter().len(), 1);
}
