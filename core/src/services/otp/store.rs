//! The OTP security store: record store, rate limiter and IP block registry
//! sharing one configuration and clock.

use std::sync::Arc;

use crate::domain::entities::{BlockReason, IpBlock};
use crate::domain::value_objects::{Identifier, PlainCode};
use crate::errors::{DomainError, DomainResult};

use super::block_registry::IpBlockRegistry;
use super::clock::{Clock, SystemClock};
use super::config::OtpSecurityConfig;
use super::generator::CodeGenerator;
use super::rate_limiter::RateLimiter;
use super::record_store::OtpRecordStore;
use super::types::{BlockStatus, RateDecision, SecurityStatus, StoreStats, VerifyOutcome};

/// In-memory store owning all OTP security state
///
/// Each of the three maps has its own lock and no operation holds two of
/// them at once.
pub struct OtpSecurityStore {
    config: OtpSecurityConfig,
    clock: Arc<dyn Clock>,
    records: OtpRecordStore,
    rate_limiter: RateLimiter,
    blocks: Arc<IpBlockRegistry>,
}

impl OtpSecurityStore {
    /// Create a store running on the wall clock
    pub fn new(config: OtpSecurityConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store with an injected time source
    pub fn with_clock(config: OtpSecurityConfig, clock: Arc<dyn Clock>) -> Self {
        let blocks = Arc::new(IpBlockRegistry::new(clock.clone()));

        let records = OtpRecordStore::new(
            blocks.clone(),
            clock.clone(),
            CodeGenerator::new(config.code_length),
            config.otp_ttl,
            config.max_attempts,
            config.attempt_block_duration,
        );

        let rate_limiter = RateLimiter::new(
            blocks.clone(),
            clock.clone(),
            config.rate_window,
            config.max_requests_per_window,
            config.ip_block_duration,
        );

        tracing::debug!(
            event = "otp_store_created",
            ttl_ms = config.otp_ttl.num_milliseconds(),
            max_attempts = config.max_attempts,
            max_requests_per_window = config.max_requests_per_window,
            code_length = config.code_length,
            "OTP security store initialised"
        );

        Self {
            config,
            clock,
            records,
            rate_limiter,
            blocks,
        }
    }

    pub fn config(&self) -> &OtpSecurityConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn records(&self) -> &OtpRecordStore {
        &self.records
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn blocks(&self) -> &IpBlockRegistry {
        &self.blocks
    }

    pub fn is_blocked(&self, ip: &str) -> BlockStatus {
        self.blocks.is_blocked(ip)
    }

    pub fn block_ip(&self, ip: &str, reason: BlockReason, duration: chrono::Duration) -> IpBlock {
        self.blocks.block(ip, reason, duration)
    }

    pub fn unblock_ip(&self, ip: &str) -> bool {
        self.blocks.unblock(ip)
    }

    pub fn check_and_record(&self, identifier: &Identifier, ip: &str) -> RateDecision {
        self.rate_limiter.check_and_record(identifier, ip)
    }

    pub fn issue(&self, identifier: &Identifier, ip: &str, user_agent: &str) -> DomainResult<PlainCode> {
        self.records.issue(identifier, ip, user_agent)
    }

    pub fn verify(
        &self,
        identifier: &Identifier,
        candidate: &str,
        ip: &str,
        user_agent: &str,
    ) -> VerifyOutcome {
        self.records.verify(identifier, candidate, ip, user_agent)
    }

    /// Diagnostics view of one identifier and IP
    ///
    /// Returns `Unauthorized` unless introspection is enabled. Never
    /// includes code material.
    pub fn security_status(&self, identifier: &Identifier, ip: &str) -> DomainResult<SecurityStatus> {
        if !self.config.debug_introspection {
            tracing::warn!(
                ip = ip,
                event = "introspection_denied",
                "Security status requested while introspection is disabled"
            );
            return Err(DomainError::Unauthorized);
        }

        Ok(SecurityStatus {
            identifier: identifier.masked(),
            checked_at: self.clock.now(),
            otp: self.records.snapshot(identifier),
            rate_limit: self.rate_limiter.snapshot(identifier),
            ip_block: self.blocks.snapshot(ip),
        })
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            active_records: self.records.len(),
            rate_windows: self.rate_limiter.len(),
            blocked_ips: self.blocks.len(),
        }
    }

    /// Drop all records, windows and blocks
    pub fn reset(&self) {
        self.records.clear();
        self.rate_limiter.clear();
        self.blocks.clear();
        tracing::info!(event = "otp_store_reset", "OTP security store cleared");
    }
}
