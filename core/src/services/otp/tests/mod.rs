mod generator_tests;
mod rate_limiter_tests;
mod store_tests;
mod sweeper_tests;

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::clock::{Clock, ManualClock};
use super::config::OtpSecurityConfig;
use super::store::OtpSecurityStore;

/// Store on a manual clock fixed at a known instant
pub(crate) fn manual_store(config: OtpSecurityConfig) -> (Arc<OtpSecurityStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ));
    let store = OtpSecurityStore::with_clock(config, clock.clone() as Arc<dyn Clock>);
    (Arc::new(store), clock)
}
