//! Request-code and submit-code flows over the OTP security store

use std::sync::Arc;

use og_shared::phone::is_valid_phone;

use crate::domain::value_objects::Identifier;
use crate::errors::{AdmissionError, DomainError, DomainResult};

use super::store::OtpSecurityStore;
use super::traits::DeliveryChannel;
use super::types::{RateDecision, SecurityStatus, SendCodeResult, VerifyCodeResult};

/// Verification orchestrator
///
/// Holds no state of its own; every decision is taken by the store.
pub struct VerificationService<D: DeliveryChannel + ?Sized> {
    store: Arc<OtpSecurityStore>,
    delivery: Arc<D>,
}

impl<D: DeliveryChannel + ?Sized> VerificationService<D> {
    pub fn new(store: Arc<OtpSecurityStore>, delivery: Arc<D>) -> Self {
        Self { store, delivery }
    }

    pub fn store(&self) -> &Arc<OtpSecurityStore> {
        &self.store
    }

    /// Issue a code for `phone` and hand it to the delivery channel
    ///
    /// Fails fast when the IP is blocked or the identifier is over its
    /// issuance cap. If delivery fails the record is kept and lapses with
    /// its TTL.
    pub async fn send_verification_code(
        &self,
        phone: &str,
        ip: &str,
        user_agent: &str,
    ) -> DomainResult<SendCodeResult> {
        let identifier = self.parse_identifier(phone)?;
        self.ensure_not_blocked(ip)?;

        let requests_remaining = match self.store.check_and_record(&identifier, ip) {
            RateDecision::Allowed { request_count, .. } => self
                .store
                .config()
                .max_requests_per_window
                .saturating_sub(request_count),
            RateDecision::Denied {
                block_remaining_ms, ..
            } => {
                return Err(AdmissionError::RateLimited {
                    remaining_ms: block_remaining_ms,
                }
                .into());
            }
        };

        let code = self.store.issue(&identifier, ip, user_agent)?;
        let expires_at = self.store.clock().now() + self.store.config().otp_ttl;

        let message_id = self
            .delivery
            .send_code(&identifier, &code)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %identifier.masked(),
                    channel = self.delivery.channel_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
                DomainError::Delivery { message: e }
            })?;

        tracing::info!(
            phone = %identifier.masked(),
            channel = self.delivery.channel_name(),
            message_id = %message_id,
            event = "otp_sent",
            "Verification code delivered"
        );

        Ok(SendCodeResult {
            message_id,
            masked_phone: identifier.masked(),
            expires_at,
            requests_remaining,
        })
    }

    /// Check a submitted code
    ///
    /// A malformed code is rejected before the store is consulted, so it
    /// never consumes an attempt.
    pub async fn verify_code(
        &self,
        phone: &str,
        code: &str,
        ip: &str,
        user_agent: &str,
    ) -> DomainResult<VerifyCodeResult> {
        let identifier = self.parse_identifier(phone)?;

        let code_length = self.store.config().code_length as usize;
        if code.len() != code_length || !code.chars().all(|c| c.is_ascii_digit()) {
            tracing::warn!(
                phone = %identifier.masked(),
                event = "invalid_code_format",
                code_length = code.len(),
                "Invalid verification code format provided"
            );
            return Err(DomainError::Validation {
                message: format!("Verification code must be {} digits", code_length),
            });
        }

        self.ensure_not_blocked(ip)?;

        let outcome = self.store.verify(&identifier, code, ip, user_agent);
        Ok(VerifyCodeResult::from(outcome))
    }

    /// Diagnostics for one phone number and IP
    pub fn security_status(&self, phone: &str, ip: &str) -> DomainResult<SecurityStatus> {
        let identifier = self.parse_identifier(phone)?;
        self.store.security_status(&identifier, ip)
    }

    /// Parse a caller-supplied number, rejecting anything the delivery
    /// channels cannot reach before any store state is touched
    fn parse_identifier(&self, phone: &str) -> DomainResult<Identifier> {
        let identifier = Identifier::parse_with_country_code(
            phone,
            self.store.config().default_country_code.as_deref(),
        )?;

        if !is_valid_phone(identifier.as_str()) {
            tracing::warn!(
                phone = %identifier.masked(),
                event = "undeliverable_phone",
                "Phone number outside deliverable length"
            );
            return Err(DomainError::Validation {
                message: format!("Invalid phone number format: {}", identifier.masked()),
            });
        }

        Ok(identifier)
    }

    fn ensure_not_blocked(&self, ip: &str) -> DomainResult<()> {
        let status = self.store.is_blocked(ip);
        match (status.blocked, status.reason) {
            (true, Some(reason)) => {
                tracing::warn!(
                    ip = ip,
                    reason = %reason,
                    event = "blocked_ip_request",
                    "Request from blocked IP rejected"
                );
                Err(AdmissionError::IpBlocked {
                    reason,
                    remaining_ms: status.remaining_ms.unwrap_or_default(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}
