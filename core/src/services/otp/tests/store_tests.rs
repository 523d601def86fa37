//! Tests for the store facade: diagnostics, stats and configuration

use chrono::Duration;
use og_shared::OtpSettings;

use crate::domain::entities::BlockReason;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainError;
use crate::services::otp::config::OtpSecurityConfig;
use crate::services::otp::store::OtpSecurityStore;
use crate::services::otp::types::{StoreStats, VerifyOutcome};

use super::manual_store;

const IP: &str = "203.0.113.7";
const UA: &str = "Mozilla/5.0";

fn introspective() -> OtpSecurityConfig {
    OtpSecurityConfig {
        debug_introspection: true,
        ..Default::default()
    }
}

#[test]
fn test_security_status_requires_introspection() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    let phone = Identifier::parse("15550100").unwrap();

    assert!(matches!(
        store.security_status(&phone, IP),
        Err(DomainError::Unauthorized)
    ));
}

#[test]
fn test_security_status_reports_metadata_only() {
    let (store, _) = manual_store(introspective());
    let phone = Identifier::parse("15550100").unwrap();

    store.check_and_record(&phone, IP);
    let code = store.issue(&phone, IP, UA).unwrap();
    store.verify(&phone, "000000", IP, UA);

    let status = store.security_status(&phone, IP).unwrap();
    assert_eq!(status.identifier, "155****0100");

    let otp = status.otp.unwrap();
    assert_eq!(otp.attempts, 1);
    assert_eq!(otp.remaining_attempts, 2);
    assert!(!otp.expired);

    let window = status.rate_limit.unwrap();
    assert_eq!(window.request_count, 1);
    assert_eq!(window.remaining_requests, 2);
    assert!(status.ip_block.is_none());

    let json = serde_json::to_string(&store.security_status(&phone, IP).unwrap()).unwrap();
    assert!(!json.contains(code.expose()));
    assert!(!json.contains("15550100"));
}

#[test]
fn test_security_status_includes_block() {
    let (store, _) = manual_store(introspective());
    let phone = Identifier::parse("15550100").unwrap();
    store.block_ip(IP, BlockReason::RateLimitExceeded, Duration::minutes(60));

    let block = store.security_status(&phone, IP).unwrap().ip_block.unwrap();
    assert_eq!(block.reason, BlockReason::RateLimitExceeded);
    assert_eq!(block.remaining_ms, 3_600_000);
    assert!(block.active);
}

#[test]
fn test_stats_and_reset() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    let phone = Identifier::parse("15550100").unwrap();

    store.check_and_record(&phone, IP);
    store.issue(&phone, IP, UA).unwrap();
    store.block_ip("198.51.100.1", BlockReason::AttemptsExceeded, Duration::minutes(30));

    assert_eq!(
        store.stats(),
        StoreStats {
            active_records: 1,
            rate_windows: 1,
            blocked_ips: 1,
        }
    );

    store.reset();
    assert_eq!(store.stats(), StoreStats::default());
    assert_eq!(store.verify(&phone, "000000", IP, UA), VerifyOutcome::NotFound);
}

#[test]
fn test_unblock_ip() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    store.block_ip(IP, BlockReason::AttemptsExceeded, Duration::minutes(30));

    assert!(store.unblock_ip(IP));
    assert!(!store.is_blocked(IP).blocked);
}

#[test]
fn test_config_from_settings() {
    let settings = OtpSettings {
        otp_ttl_ms: 60_000,
        max_attempts: 5,
        code_length: 8,
        sweep_interval_ms: 1_000,
        otp_debug_introspection: true,
        ..Default::default()
    };

    let config = OtpSecurityConfig::try_from(&settings).unwrap();
    assert_eq!(config.otp_ttl, Duration::seconds(60));
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.rate_window, Duration::minutes(15));
    assert_eq!(config.ip_block_duration, Duration::minutes(60));
    assert_eq!(config.attempt_block_duration, Duration::minutes(30));
    assert_eq!(config.code_length, 8);
    assert_eq!(config.sweep_interval, std::time::Duration::from_secs(1));
    assert!(config.debug_introspection);
}

#[test]
fn test_config_defaults_match_settings_defaults() {
    let from_settings = OtpSecurityConfig::try_from(&OtpSettings::default()).unwrap();
    let default = OtpSecurityConfig::default();

    assert_eq!(from_settings.otp_ttl, default.otp_ttl);
    assert_eq!(from_settings.max_attempts, default.max_attempts);
    assert_eq!(from_settings.rate_window, default.rate_window);
    assert_eq!(from_settings.max_requests_per_window, default.max_requests_per_window);
    assert_eq!(from_settings.ip_block_duration, default.ip_block_duration);
    assert_eq!(from_settings.attempt_block_duration, default.attempt_block_duration);
    assert_eq!(from_settings.code_length, default.code_length);
    assert_eq!(from_settings.sweep_interval, default.sweep_interval);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let settings = OtpSettings {
        max_attempts: 0,
        ..Default::default()
    };

    assert!(matches!(
        OtpSecurityConfig::try_from(&settings),
        Err(DomainError::Configuration(_))
    ));
}

#[test]
fn test_custom_code_length_is_used() {
    let store = OtpSecurityStore::new(OtpSecurityConfig {
        code_length: 8,
        ..Default::default()
    });
    let phone = Identifier::parse("15550100").unwrap();

    let code = store.issue(&phone, IP, UA).unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(store.verify(&phone, code.expose(), IP, UA), VerifyOutcome::Success);
}
