//! Unit tests for delivery channel creation

use og_shared::Environment;

use crate::config::{DeliveryConfig, DeliveryProvider, WhatsAppConfig};
use crate::delivery::create_delivery_channel;
use crate::InfrastructureError;

#[test]
fn test_create_mock_channel() {
    let channel = create_delivery_channel(&DeliveryConfig::default()).unwrap();
    assert_eq!(channel.channel_name(), "mock");
}

#[test]
fn test_mock_channel_refused_in_production() {
    let config = DeliveryConfig {
        environment: Environment::Production,
        ..Default::default()
    };

    match create_delivery_channel(&config) {
        Err(InfrastructureError::Config(message)) => assert!(message.contains("production")),
        Err(other) => panic!("expected Config error, got {:?}", other),
        Ok(_) => panic!("mock channel must not be created in production"),
    }
}

#[test]
fn test_create_mock_channel_in_staging() {
    let config = DeliveryConfig {
        environment: Environment::Staging,
        ..Default::default()
    };
    assert_eq!(create_delivery_channel(&config).unwrap().channel_name(), "mock");
}

#[test]
fn test_create_whatsapp_channel() {
    let config = DeliveryConfig {
        provider: DeliveryProvider::WhatsApp,
        whatsapp: Some(WhatsAppConfig {
            access_token: "EAAG-test-token".to_string(),
            phone_number_id: "106540352242922".to_string(),
            api_base: "https://graph.facebook.com/v22.0".to_string(),
            template_name: "otp_verification".to_string(),
            template_language: "en_US".to_string(),
            request_timeout_secs: 10,
        }),
        environment: Environment::Production,
    };

    let channel = create_delivery_channel(&config).unwrap();
    assert_eq!(channel.channel_name(), "whatsapp");
}

#[test]
fn test_whatsapp_without_credentials_fails() {
    let config = DeliveryConfig {
        provider: DeliveryProvider::WhatsApp,
        whatsapp: None,
        ..Default::default()
    };

    assert!(matches!(
        create_delivery_channel(&config),
        Err(InfrastructureError::Config(_))
    ));
}
