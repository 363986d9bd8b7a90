//! Twilio implementation of the verification ChannelSender for SMS.

use async_trait::async_trait;
use twilio::{Client, OutboundMessage};

use rently_core::domain::entities::verification_code::Channel;
use rently_core::errors::DomainError;
use rently_core::services::verification::{mask_destination, ChannelSender};

use crate::InfrastructureError;

/// Twilio SMS sender configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number, E.164)
    pub from_number: String,
}

impl TwilioConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let from_number = std::env::var("TWILIO_FROM_NUMBER")
            .map_err(|_| InfrastructureError::Config("TWILIO_FROM_NUMBER not set".to_string()))?;

        if !from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
        })
    }
}

/// Twilio SMS sender for verification codes
pub struct TwilioSmsSender {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSmsSender {
    /// Create a new Twilio sender
    pub fn new(config: TwilioConfig) -> Self {
        let client = Client::new(&config.account_sid, &config.auth_token);
        tracing::info!(
            from = %mask_destination(&config.from_number, Channel::Phone),
            event = "twilio_sender_initialized",
            "Twilio SMS sender initialized"
        );
        Self { client, config }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Ok(Self::new(TwilioConfig::from_env()?))
    }
}

#[async_trait]
impl ChannelSender for TwilioSmsSender {
    async fn send(&self, destination: &str, body: &str) -> Result<(), DomainError> {
        self.client
            .send_message(OutboundMessage::new(
                &self.config.from_number,
                destination,
                body,
            ))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Twilio send failed: {}", e),
            })?;

        tracing::debug!(
            to = %mask_destination(destination, Channel::Phone),
            event = "sms_sent",
            "Verification SMS dispatched"
        );
        Ok(())
    }
}
