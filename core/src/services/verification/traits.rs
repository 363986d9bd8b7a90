//! Delivery trait implemented by the concrete channel transports

use async_trait::async_trait;

use crate::errors::DomainError;

/// Sends a rendered verification message to a single destination.
///
/// One implementation per channel (SMTP email, Twilio SMS, mocks). The engine
/// logs delivery failures and never retries; implementations should not retry
/// either.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Deliver `body` to `destination`
    async fn send(&self, destination: &str, body: &str) -> Result<(), DomainError>;
}

// Lets binaries pick a provider at runtime while services stay generic.
#[async_trait]
impl ChannelSender for std::sync::Arc<dyn ChannelSender> {
    async fn send(&self, destination: &str, body: &str) -> Result<(), DomainError> {
        (**self).send(destination, body).await
    }
}
