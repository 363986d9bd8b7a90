//! Main verification engine implementation

use chrono::Utc;
use rand::{rngs::OsRng, Rng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::domain::entities::verification_code::{Channel, VerificationCode};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{UserRepository, VerificationCodeRepository};

use super::config::VerificationConfig;
use super::masking::normalize_destination;
use super::traits::ChannelSender;

/// Verification engine handling code issuance and confirmation
///
/// Confirmation serializes per (user, channel, destination): the
/// read-increment-compare-write sequence for one key runs under a dedicated
/// async mutex, so concurrent confirmations cannot both consume a code or
/// skip each other's attempt increments.
pub struct VerificationService<U, V, E, S>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    E: ChannelSender,
    S: ChannelSender,
{
    user_repository: Arc<U>,
    code_repository: Arc<V>,
    email_sender: Arc<E>,
    sms_sender: Arc<S>,
    config: VerificationConfig,
    /// One mutex per confirmation key; entries live for the process lifetime
    confirmation_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<U, V, E, S> VerificationService<U, V, E, S>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    E: ChannelSender,
    S: ChannelSender,
{
    /// Create a new verification engine
    pub fn new(
        user_repository: Arc<U>,
        code_repository: Arc<V>,
        email_sender: Arc<E>,
        sms_sender: Arc<S>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            user_repository,
            code_repository,
            email_sender,
            sms_sender,
            config,
            confirmation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Issue a fresh code for `destination` and dispatch it through the channel.
    ///
    /// The raw code is never persisted; only its bcrypt hash is stored. A
    /// delivery failure is logged and swallowed so issuance always succeeds
    /// once the row is written.
    pub async fn issue_code(
        &self,
        user: &User,
        channel: Channel,
        destination: &str,
    ) -> DomainResult<VerificationCode> {
        let destination = normalize_destination(destination, channel);
        let destination = destination.as_str();
        let raw_code = self.generate_code();
        let code_hash =
            bcrypt::hash(&raw_code, bcrypt::DEFAULT_COST).map_err(|e| DomainError::Internal {
                message: format!("Failed to hash verification code: {}", e),
            })?;

        let mut code = VerificationCode::new(
            user.id,
            channel,
            destination.to_string(),
            code_hash,
            self.config.ttl_minutes,
        );
        code.sent_at = Some(Utc::now());
        let code = self.code_repository.create(code).await?;

        tracing::info!(
            user_id = %user.id,
            channel = channel.as_str(),
            code_id = %code.id,
            event = "verification_code_issued",
            "Issued verification code"
        );

        let body = self.render_message(user, channel, &raw_code);
        let sender: &dyn ChannelSender = match channel {
            Channel::Email => self.email_sender.as_ref(),
            Channel::Phone => self.sms_sender.as_ref(),
        };
        if let Err(e) = sender.send(destination, &body).await {
            tracing::warn!(
                user_id = %user.id,
                channel = channel.as_str(),
                code_id = %code.id,
                error = %e,
                event = "verification_dispatch_failed",
                "Failed to deliver verification code"
            );
        }

        Ok(code)
    }

    /// Confirm a code for the account owning `destination`.
    ///
    /// Every failure mode that could reveal account existence collapses into
    /// `AuthError::InvalidCode`; only an exhausted live code answers
    /// differently, with `AuthError::TooManyAttempts`.
    ///
    /// Returns the user, now marked verified through `channel`.
    pub async fn confirm_code(
        &self,
        channel: Channel,
        destination: &str,
        raw_code: &str,
    ) -> DomainResult<User> {
        let destination = normalize_destination(destination, channel);
        let destination = destination.as_str();
        let user = self
            .find_user_by_destination(channel, destination)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCode))?;

        let lock = self.lock_for(user.id, channel, destination).await;
        let _guard = lock.lock().await;

        let now = Utc::now();
        let code = self
            .code_repository
            .find_latest_active(user.id, channel, destination, now)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCode))?;

        if code.attempt_count >= self.config.max_attempts {
            tracing::warn!(
                user_id = %user.id,
                channel = channel.as_str(),
                code_id = %code.id,
                attempt_count = code.attempt_count,
                event = "verification_attempts_exhausted",
                "Verification code attempt limit reached"
            );
            return Err(DomainError::Auth(AuthError::TooManyAttempts));
        }

        // The increment sticks even when the guess below turns out wrong.
        self.code_repository.record_attempt(code.id, now).await?;

        let matches =
            bcrypt::verify(raw_code, &code.code_hash).map_err(|e| DomainError::Internal {
                message: format!("Failed to verify code hash: {}", e),
            })?;
        if !matches {
            return Err(DomainError::Auth(AuthError::InvalidCode));
        }

        let mut user = user;
        user.mark_verified(channel, now);
        // Consume and user write land in one atomic unit; losing the
        // compare-and-set on `used_at` writes nothing.
        let user = self
            .code_repository
            .consume_and_mark_verified(code.id, user, now)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCode))?;

        tracing::info!(
            user_id = %user.id,
            channel = channel.as_str(),
            code_id = %code.id,
            event = "verification_confirmed",
            "Account verified"
        );

        Ok(user)
    }

    /// Uniform random numeric code of exactly the configured length
    fn generate_code(&self) -> String {
        let length = self.config.effective_code_length();
        let start = 10u64.pow(length - 1);
        let end = 10u64.pow(length) - 1;
        OsRng.gen_range(start..=end).to_string()
    }

    fn render_message(&self, user: &User, channel: Channel, raw_code: &str) -> String {
        match channel {
            Channel::Email => {
                let name = user.first_name.trim();
                let greeting = if name.is_empty() { "there" } else { name };
                format!(
                    "Hello {},\n\nYour verification code is: {}\n\nIt expires in {} minutes.\n\n\
                     If you did not create an account, you can ignore this email.",
                    greeting, raw_code, self.config.ttl_minutes
                )
            }
            Channel::Phone => format!(
                "Your Rently verification code is {}. It expires in {} minutes.",
                raw_code, self.config.ttl_minutes
            ),
        }
    }

    async fn find_user_by_destination(
        &self,
        channel: Channel,
        destination: &str,
    ) -> DomainResult<Option<User>> {
        match channel {
            Channel::Email => self.user_repository.find_by_email(destination).await,
            Channel::Phone => self.user_repository.find_by_phone(destination).await,
        }
    }

    async fn lock_for(&self, user_id: Uuid, channel: Channel, destination: &str) -> Arc<Mutex<()>> {
        let key = format!("{}:{}:{}", user_id, channel.as_str(), destination);
        let mut locks = self.confirmation_locks.lock().await;
        locks.entry(key).or_default().clone()
    }
}
