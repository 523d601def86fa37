//! Hashed OTP records keyed by identifier

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Duration;

use crate::domain::entities::{BlockReason, OtpRecord};
use crate::domain::value_objects::{Identifier, PlainCode};
use crate::errors::DomainResult;

use super::block_registry::IpBlockRegistry;
use super::clock::Clock;
use super::fingerprint::device_fingerprint;
use super::generator::CodeGenerator;
use super::hasher::CodeHasher;
use super::lock;
use super::types::{RecordSnapshot, VerifyOutcome};

/// One live code per identifier
///
/// Every verification runs its read-modify-write inside a single critical
/// section on the record map, so concurrent submissions for the same
/// identifier observe a consistent attempt count.
pub struct OtpRecordStore {
    records: Mutex<HashMap<Identifier, OtpRecord>>,
    blocks: Arc<IpBlockRegistry>,
    clock: Arc<dyn Clock>,
    generator: CodeGenerator,
    ttl: Duration,
    max_attempts: u32,
    attempt_block_duration: Duration,
}

impl OtpRecordStore {
    pub fn new(
        blocks: Arc<IpBlockRegistry>,
        clock: Arc<dyn Clock>,
        generator: CodeGenerator,
        ttl: Duration,
        max_attempts: u32,
        attempt_block_duration: Duration,
    ) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            blocks,
            clock,
            generator,
            ttl,
            max_attempts,
            attempt_block_duration,
        }
    }

    /// Issue a fresh code, replacing any existing record for the identifier
    ///
    /// The plaintext is returned exactly once and never retained.
    pub fn issue(&self, identifier: &Identifier, ip: &str, user_agent: &str) -> DomainResult<PlainCode> {
        let code = self.generator.generate()?;
        let record = OtpRecord::new(
            identifier.clone(),
            CodeHasher::hash(code.expose()),
            self.clock.now(),
            ip.to_string(),
            device_fingerprint(user_agent, ip),
            user_agent.to_string(),
        );
        let expires_at = record.expires_at(self.ttl);
        let replaced = self.store_record(record);

        tracing::info!(
            phone = %identifier.masked(),
            ip = ip,
            event = "otp_issued",
            expires_at = %expires_at,
            replaced_previous = replaced,
            "Verification code issued"
        );

        Ok(code)
    }

    /// Insert a record, returning whether one was replaced
    pub(crate) fn store_record(&self, record: OtpRecord) -> bool {
        lock(&self.records)
            .insert(record.identifier.clone(), record)
            .is_some()
    }

    /// Check a candidate code against the stored record
    pub fn verify(
        &self,
        identifier: &Identifier,
        candidate: &str,
        ip: &str,
        user_agent: &str,
    ) -> VerifyOutcome {
        let candidate_hash = CodeHasher::hash(candidate);
        let device_id = device_fingerprint(user_agent, ip);
        let now = self.clock.now();

        let outcome = {
            let mut records = lock(&self.records);

            let Some(record) = records.get_mut(identifier) else {
                tracing::info!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "otp_not_found",
                    "No active verification code"
                );
                return VerifyOutcome::NotFound;
            };

            if record.is_expired(now, self.ttl) {
                records.remove(identifier);
                tracing::info!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "otp_expired",
                    "Verification code expired"
                );
                return VerifyOutcome::Expired;
            }

            if record.is_exhausted(self.max_attempts) {
                records.remove(identifier);
                None
            } else {
                if record.device_id != device_id {
                    tracing::warn!(
                        phone = %identifier.masked(),
                        ip = ip,
                        source_ip = %record.source_ip,
                        event = "device_mismatch",
                        "Verification from a different device than issuance"
                    );
                }

                let attempts = record.record_attempt();
                if CodeHasher::compare(&candidate_hash, &record.code_hash) {
                    records.remove(identifier);
                    Some(VerifyOutcome::Success)
                } else {
                    Some(VerifyOutcome::Mismatch {
                        remaining_attempts: self.max_attempts.saturating_sub(attempts),
                    })
                }
            }
        };

        match outcome {
            Some(VerifyOutcome::Success) => {
                tracing::info!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "otp_verified",
                    "Verification code accepted"
                );
                VerifyOutcome::Success
            }
            Some(mismatch) => {
                tracing::warn!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "otp_mismatch",
                    "Invalid verification code submitted"
                );
                mismatch
            }
            None => {
                tracing::warn!(
                    phone = %identifier.masked(),
                    ip = ip,
                    event = "otp_attempts_exceeded",
                    max_attempts = self.max_attempts,
                    "Verification attempts exhausted"
                );
                let block = self.blocks.block(
                    ip,
                    BlockReason::AttemptsExceeded,
                    self.attempt_block_duration,
                );
                VerifyOutcome::AttemptsExceeded {
                    blocked_ms: block.remaining_ms(now),
                }
            }
        }
    }

    /// Remove every expired record, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = lock(&self.records);
        let before = records.len();
        records.retain(|_, record| !record.is_expired(now, self.ttl));
        before - records.len()
    }

    pub fn snapshot(&self, identifier: &Identifier) -> Option<RecordSnapshot> {
        let now = self.clock.now();
        lock(&self.records).get(identifier).map(|record| RecordSnapshot {
            issued_at: record.issued_at,
            expires_at: record.expires_at(self.ttl),
            attempts: record.attempts,
            remaining_attempts: record.remaining_attempts(self.max_attempts),
            expired: record.is_expired(now, self.ttl),
            source_ip: record.source_ip.clone(),
            device_id: record.device_id.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
    }
}
