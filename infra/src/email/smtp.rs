//! SMTP implementation of the verification ChannelSender for email.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::SmtpTransport;
use lettre::{Message, Transport};
use std::sync::Arc;

use rently_core::errors::DomainError;
use rently_core::services::verification::ChannelSender;

use crate::InfrastructureError;

/// Configuration for the SMTP email sender
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server host
    pub host: String,
    /// SMTP server port (587 for STARTTLS)
    pub port: u16,
    /// SMTP username
    pub username: String,
    /// SMTP password
    pub password: String,
    /// Sender email address
    pub from_email: String,
    /// Sender display name
    pub from_name: String,
    /// Subject line for verification emails
    pub subject: String,
}

impl SmtpConfig {
    /// Create configuration from environment variables.
    ///
    /// Credentials are required; missing ones fail at startup rather than at
    /// first send.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let username = std::env::var("SMTP_USERNAME")
            .map_err(|_| InfrastructureError::Config("SMTP_USERNAME not set".to_string()))?;
        let password = std::env::var("SMTP_PASSWORD")
            .map_err(|_| InfrastructureError::Config("SMTP_PASSWORD not set".to_string()))?;

        Ok(Self {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            username,
            password,
            from_email: std::env::var("SMTP_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@rently.io".to_string()),
            from_name: std::env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Rently".to_string()),
            subject: "Verify your Rently account".to_string(),
        })
    }
}

/// SMTP email sender for verification codes
pub struct SmtpEmailSender {
    transport: Arc<SmtpTransport>,
    config: SmtpConfig,
}

impl SmtpEmailSender {
    /// Create a new SMTP sender
    pub fn new(config: SmtpConfig) -> Result<Self, InfrastructureError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport: Arc::new(transport),
            config,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(SmtpConfig::from_env()?)
    }
}

#[async_trait]
impl ChannelSender for SmtpEmailSender {
    async fn send(&self, destination: &str, body: &str) -> Result<(), DomainError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid from address: {}", e),
            })?;
        let to = destination.parse().map_err(|e| DomainError::Internal {
            message: format!("Invalid recipient address: {}", e),
        })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(&self.config.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to build email: {}", e),
            })?;

        // lettre's SmtpTransport is blocking.
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Email send task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to send email: {}", e),
            })?;

        tracing::debug!(event = "email_sent", "Verification email dispatched");
        Ok(())
    }
}
