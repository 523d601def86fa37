//! Tests for the eviction sweep

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::domain::entities::BlockReason;
use crate::domain::value_objects::Identifier;
use crate::services::otp::config::OtpSecurityConfig;
use crate::services::otp::sweeper::{EvictionScheduler, SweepResult};

use super::manual_store;

const IP: &str = "203.0.113.7";
const UA: &str = "Mozilla/5.0";

#[test]
fn test_sweep_on_empty_store() {
    let (store, _) = manual_store(OtpSecurityConfig::default());
    let scheduler = EvictionScheduler::new(store);

    let result = scheduler.run_sweep();
    assert_eq!(result, SweepResult::default());
    assert_eq!(result.total_cleaned(), 0);
}

#[test]
fn test_sweep_evicts_only_stale_entries() {
    let (store, clock) = manual_store(OtpSecurityConfig::default());
    let old = Identifier::parse("15550100").unwrap();
    let fresh = Identifier::parse("15550101").unwrap();

    store.check_and_record(&old, IP);
    store.issue(&old, IP, UA).unwrap();
    store.block_ip("198.51.100.1", BlockReason::AttemptsExceeded, Duration::minutes(10));
    store.block_ip("198.51.100.2", BlockReason::RateLimitExceeded, Duration::minutes(60));

    clock.advance(Duration::minutes(14));
    store.check_and_record(&fresh, IP);
    store.issue(&fresh, IP, UA).unwrap();

    clock.advance(Duration::minutes(1) + Duration::milliseconds(1));
    let scheduler = EvictionScheduler::new(store.clone());
    let result = scheduler.run_sweep();

    assert_eq!(
        result,
        SweepResult {
            expired_records: 1,
            stale_windows: 1,
            expired_blocks: 1,
        }
    );
    assert_eq!(result.total_cleaned(), 3);

    let stats = store.stats();
    assert_eq!(stats.active_records, 1);
    assert_eq!(stats.rate_windows, 1);
    assert_eq!(stats.blocked_ips, 1);
}

#[test]
fn test_interval_follows_config() {
    let (store, _) = manual_store(OtpSecurityConfig {
        sweep_interval: StdDuration::from_secs(42),
        ..Default::default()
    });

    assert_eq!(EvictionScheduler::new(store.clone()).interval(), StdDuration::from_secs(42));
    assert_eq!(
        EvictionScheduler::with_interval(store, StdDuration::from_millis(10)).interval(),
        StdDuration::from_millis(10)
    );
}

#[tokio::test(start_paused = true)]
async fn test_background_task_sweeps_periodically() {
    let (store, clock) = manual_store(OtpSecurityConfig::default());
    let phone = Identifier::parse("15550100").unwrap();
    store.issue(&phone, IP, UA).unwrap();
    clock.advance(Duration::minutes(6));

    let scheduler = Arc::new(EvictionScheduler::with_interval(
        store.clone(),
        StdDuration::from_secs(60),
    ));
    let handle = scheduler.start_background_task();

    // Before the first period the record is untouched
    tokio::time::sleep(StdDuration::from_secs(30)).await;
    assert_eq!(store.records().len(), 1);

    tokio::time::sleep(StdDuration::from_secs(31)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.records().len(), 0);

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
}
