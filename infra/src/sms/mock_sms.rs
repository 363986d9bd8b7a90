//! Console-logging SMS sender for development environments.

use async_trait::async_trait;

use rently_core::domain::entities::verification_code::Channel;
use rently_core::errors::DomainError;
use rently_core::services::verification::{mask_destination, ChannelSender};

/// SMS sender that logs instead of delivering; for development and tests
#[derive(Debug, Clone, Default)]
pub struct MockSmsSender;

impl MockSmsSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelSender for MockSmsSender {
    async fn send(&self, destination: &str, body: &str) -> Result<(), DomainError> {
        tracing::info!(
            to = %mask_destination(destination, Channel::Phone),
            body = body,
            event = "mock_sms_sent",
            "Mock SMS (not delivered)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_send_always_succeeds() {
        let sender = MockSmsSender::new();
        assert!(sender.send("+15550001111", "Your code is 123456").await.is_ok());
    }
}
