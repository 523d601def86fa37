//! Configuration for delivery providers
//!
//! Values come from the process environment after `.env` has been loaded.

use std::fmt;
use std::str::FromStr;

use og_shared::Environment;

use crate::InfrastructureError;

/// Default WhatsApp Graph API base URL
pub const DEFAULT_WHATSAPP_API_BASE: &str = "https://graph.facebook.com/v22.0";

/// Default approved template carrying the code
pub const DEFAULT_WHATSAPP_TEMPLATE: &str = "otp_verification";

/// Default template language
pub const DEFAULT_WHATSAPP_LANGUAGE: &str = "en_US";

/// Which channel carries verification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryProvider {
    #[default]
    Mock,
    WhatsApp,
}

impl FromStr for DeliveryProvider {
    type Err = InfrastructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(DeliveryProvider::Mock),
            "whatsapp" => Ok(DeliveryProvider::WhatsApp),
            other => Err(InfrastructureError::Config(format!(
                "Unknown DELIVERY_PROVIDER '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DeliveryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryProvider::Mock => write!(f, "mock"),
            DeliveryProvider::WhatsApp => write!(f, "whatsapp"),
        }
    }
}

/// WhatsApp Cloud API credentials and template settings
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Bearer token for the Graph API
    pub access_token: String,
    /// Sending phone number ID
    pub phone_number_id: String,
    /// Graph API base URL including version
    pub api_base: String,
    /// Authentication template name
    pub template_name: String,
    /// Template language code
    pub template_language: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl WhatsAppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let access_token = std::env::var("WHATSAPP_ACCESS_TOKEN").map_err(|_| {
            InfrastructureError::Config("WHATSAPP_ACCESS_TOKEN not set".to_string())
        })?;
        let phone_number_id = std::env::var("WHATSAPP_PHONE_NUMBER_ID").map_err(|_| {
            InfrastructureError::Config("WHATSAPP_PHONE_NUMBER_ID not set".to_string())
        })?;

        let config = Self {
            access_token,
            phone_number_id,
            api_base: std::env::var("WHATSAPP_API_BASE")
                .unwrap_or_else(|_| DEFAULT_WHATSAPP_API_BASE.to_string()),
            template_name: std::env::var("WHATSAPP_TEMPLATE_NAME")
                .unwrap_or_else(|_| DEFAULT_WHATSAPP_TEMPLATE.to_string()),
            template_language: std::env::var("WHATSAPP_TEMPLATE_LANGUAGE")
                .unwrap_or_else(|_| DEFAULT_WHATSAPP_LANGUAGE.to_string()),
            request_timeout_secs: match std::env::var("WHATSAPP_REQUEST_TIMEOUT_SECS") {
                Ok(value) => value.parse().map_err(|_| {
                    InfrastructureError::Config(
                        "WHATSAPP_REQUEST_TIMEOUT_SECS must be a whole number".to_string(),
                    )
                })?,
                Err(_) => 30,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject blank credentials
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if self.access_token.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "WHATSAPP_ACCESS_TOKEN must not be empty".to_string(),
            ));
        }
        if self.phone_number_id.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "WHATSAPP_PHONE_NUMBER_ID must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Messages endpoint for the configured phone number
    pub fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.api_base.trim_end_matches('/'),
            self.phone_number_id
        )
    }
}

/// Delivery settings
#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    pub provider: DeliveryProvider,
    /// Deployment environment; the mock provider is refused in production
    pub environment: Environment,
    /// Present when the provider is WhatsApp
    pub whatsapp: Option<WhatsAppConfig>,
}

impl DeliveryConfig {
    /// Load delivery settings, reading `.env` if present
    pub fn from_env() -> Result<Self, InfrastructureError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let provider = match std::env::var("DELIVERY_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => DeliveryProvider::default(),
        };

        let whatsapp = match provider {
            DeliveryProvider::WhatsApp => Some(WhatsAppConfig::from_env()?),
            DeliveryProvider::Mock => None,
        };

        Ok(Self {
            provider,
            environment,
            whatsapp,
        })
    }
}
