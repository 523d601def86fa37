//! WhatsApp Cloud API delivery channel
//!
//! Sends the code through an approved authentication template: the code
//! fills the body parameter and the copy-code URL button.

use std::time::Duration;

use async_trait::async_trait;
use og_core::domain::{Identifier, PlainCode};
use og_core::services::DeliveryChannel;
use og_shared::phone::{is_valid_phone, mask_phone_number};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::WhatsAppConfig;
use crate::InfrastructureError;

/// Successful send response
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub id: String,
}

/// Graph API error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

/// Build the template message body for one recipient
pub fn template_payload(config: &WhatsAppConfig, recipient: &str, code: &str) -> Value {
    json!({
        "messaging_product": "whatsapp",
        "recipient_type": "individual",
        "to": recipient,
        "type": "template",
        "template": {
            "name": config.template_name,
            "language": { "code": config.template_language },
            "components": [
                {
                    "type": "body",
                    "parameters": [{ "type": "text", "text": code }]
                },
                {
                    "type": "button",
                    "sub_type": "url",
                    "index": "0",
                    "parameters": [{ "type": "text", "text": code }]
                }
            ]
        }
    })
}

/// Extract the message ID from a successful response body
pub fn parse_message_id(body: &str) -> Result<String, InfrastructureError> {
    let response: SendMessageResponse = serde_json::from_str(body).map_err(|e| {
        InfrastructureError::Delivery(format!("Unexpected WhatsApp response: {}", e))
    })?;

    response
        .messages
        .into_iter()
        .next()
        .map(|message| message.id)
        .ok_or_else(|| {
            InfrastructureError::Delivery("WhatsApp response had no message ID".to_string())
        })
}

/// Describe a failed response, preferring the API's own error message
pub fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(envelope) => match envelope.error.code {
            Some(code) => format!(
                "WhatsApp API error {} ({}): {}",
                status.as_u16(),
                code,
                envelope.error.message
            ),
            None => format!(
                "WhatsApp API error {}: {}",
                status.as_u16(),
                envelope.error.message
            ),
        },
        Err(_) => format!("WhatsApp API error {}", status.as_u16()),
    }
}

/// WhatsApp template delivery
pub struct WhatsAppDeliveryChannel {
    client: Client,
    config: WhatsAppConfig,
}

impl WhatsAppDeliveryChannel {
    pub fn new(config: WhatsAppConfig) -> Result<Self, InfrastructureError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            provider = "whatsapp",
            template = %config.template_name,
            "WhatsApp delivery channel initialized"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    async fn send_template(&self, recipient: &str, code: &str) -> Result<String, InfrastructureError> {
        let url = self.config.messages_url();
        debug!(
            provider = "whatsapp",
            phone = %mask_phone_number(recipient),
            "Posting template message"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&template_payload(&self.config, recipient, code))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(InfrastructureError::Delivery(describe_error(status, &body)));
        }

        parse_message_id(&body)
    }
}

#[async_trait]
impl DeliveryChannel for WhatsAppDeliveryChannel {
    async fn send_code(&self, identifier: &Identifier, code: &PlainCode) -> Result<String, String> {
        let recipient = identifier.as_str();
        let masked_phone = mask_phone_number(recipient);

        if !is_valid_phone(recipient) {
            return Err(format!("Invalid phone number format: {}", masked_phone));
        }

        match self.send_template(recipient, code.expose()).await {
            Ok(message_id) => {
                info!(
                    target: "delivery",
                    provider = "whatsapp",
                    phone = %masked_phone,
                    message_id = %message_id,
                    "Verification code sent via WhatsApp"
                );
                Ok(message_id)
            }
            Err(e) => {
                error!(
                    target: "delivery",
                    provider = "whatsapp",
                    phone = %masked_phone,
                    error = %e,
                    "WhatsApp delivery failed"
                );
                Err(e.to_string())
            }
        }
    }

    fn channel_name(&self) -> &'static str {
        "whatsapp"
    }
}
