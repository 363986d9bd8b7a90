//! Main auth gateway implementation

use std::sync::Arc;

use rently_shared::utils::validation::{is_valid_email, is_valid_phone};

use crate::domain::entities::user::{User, UserRole};
use crate::domain::entities::verification_code::Channel;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use crate::services::token::TokenService;
use crate::services::verification::{
    mask_destination, normalize_destination, ChannelSender, VerificationService,
};

use super::password::{hash_password, verify_password};

/// Input for account registration, already shape-validated at the API edge
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    /// Preferred verification channel; defaults to email
    pub verify_via: Option<Channel>,
}

/// What a successful registration hands back to the API layer
#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub user: User,
    /// Channel a code was actually sent through
    pub channel: Channel,
    /// Destination the code went to, masked for display
    pub masked_destination: String,
}

/// Auth gateway orchestrating the user store, verification engine and token
/// issuer
pub struct AuthService<U, V, E, S, T>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    E: ChannelSender,
    S: ChannelSender,
    T: TokenRepository,
{
    user_repository: Arc<U>,
    verification: Arc<VerificationService<U, V, E, S>>,
    token_service: Arc<TokenService<T>>,
}

impl<U, V, E, S, T> AuthService<U, V, E, S, T>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    E: ChannelSender,
    S: ChannelSender,
    T: TokenRepository,
{
    /// Create a new auth gateway
    pub fn new(
        user_repository: Arc<U>,
        verification: Arc<VerificationService<U, V, E, S>>,
        token_service: Arc<TokenService<T>>,
    ) -> Self {
        Self {
            user_repository,
            verification,
            token_service,
        }
    }

    /// Register a new, unverified account and send its first verification code.
    ///
    /// The phone channel silently falls back to email when no phone number is
    /// on file. Registration succeeds even if code delivery fails; the client
    /// can re-request through verification start.
    pub async fn register(&self, data: RegisterData) -> DomainResult<RegistrationOutcome> {
        if !is_valid_email(data.email.trim()) {
            return Err(DomainError::ValidationErr(ValidationError::InvalidEmail));
        }
        if let Some(phone) = data.phone_number.as_deref() {
            if !is_valid_phone(phone) {
                return Err(DomainError::ValidationErr(ValidationError::InvalidFormat {
                    field: "phone_number".to_string(),
                }));
            }
        }

        let password_hash = hash_password(&data.password)?;
        let user = User::new(
            data.email,
            password_hash,
            data.first_name,
            data.last_name,
            data.phone_number,
            data.role,
        );
        let user = self.user_repository.create(user).await?;

        let requested = data.verify_via.unwrap_or(Channel::Email);
        let (channel, destination) = match (requested, user.phone_number.as_deref()) {
            (Channel::Phone, Some(phone)) => (Channel::Phone, phone.to_string()),
            _ => (Channel::Email, user.email.clone()),
        };

        self.verification
            .issue_code(&user, channel, &destination)
            .await?;

        tracing::info!(
            user_id = %user.id,
            role = user.role.as_str(),
            channel = channel.as_str(),
            event = "user_registered",
            "Registered new user"
        );

        Ok(RegistrationOutcome {
            user,
            channel,
            masked_destination: mask_destination(&destination, channel),
        })
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email and wrong password produce the same
    /// `AuthError::InvalidCredentials`. Checks run in a fixed order: account
    /// exists, account active, password matches, account verified. An
    /// unverified account never receives tokens; the error carries the
    /// unmasked destinations since the caller has just proven the password.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCredentials))?;

        if !user.is_active {
            return Err(DomainError::Auth(AuthError::AccountInactive));
        }
        if !verify_password(password, &user.password_hash)? {
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }
        if !user.is_verified {
            return Err(DomainError::Auth(AuthError::VerificationRequired {
                email: user.email.clone(),
                phone_number: user.phone_number.clone(),
            }));
        }

        let pair = self.token_service.generate_tokens(&user).await?;
        tracing::info!(
            user_id = %user.id,
            event = "user_logged_in",
            "User logged in"
        );
        Ok(AuthResponse::from_token_pair(pair, user))
    }

    /// Start (or restart) verification for a destination.
    ///
    /// Unknown accounts and already-verified accounts yield `Ok(None)` with no
    /// code row created, indistinguishable from the outside from a real send.
    pub async fn start_verification(
        &self,
        channel: Channel,
        destination: &str,
    ) -> DomainResult<Option<String>> {
        let destination = normalize_destination(destination, channel);
        let destination = destination.as_str();
        let user = match channel {
            Channel::Email => self.user_repository.find_by_email(destination).await?,
            Channel::Phone => self.user_repository.find_by_phone(destination).await?,
        };
        let user = match user {
            Some(user) if user.is_active && !user.is_verified => user,
            _ => return Ok(None),
        };

        self.verification
            .issue_code(&user, channel, destination)
            .await?;
        Ok(Some(mask_destination(destination, channel)))
    }

    /// Confirm a verification code and open a session for the verified user
    pub async fn confirm_verification(
        &self,
        channel: Channel,
        destination: &str,
        code: &str,
    ) -> DomainResult<AuthResponse> {
        let user = self
            .verification
            .confirm_code(channel, destination, code)
            .await?;
        let pair = self.token_service.generate_tokens(&user).await?;
        Ok(AuthResponse::from_token_pair(pair, user))
    }

    /// Exchange a refresh token for a fresh pair, rotating the old one out
    pub async fn refresh_token(&self, raw_token: &str) -> DomainResult<AuthResponse> {
        let stored = self.token_service.validate_refresh_token(raw_token).await?;
        let user = self
            .user_repository
            .find_by_id(stored.user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })?;
        if !user.is_active {
            return Err(DomainError::Auth(AuthError::AccountInactive));
        }

        // Rotation: the old token dies before the new pair is issued.
        self.token_service.invalidate_refresh_token(raw_token).await?;
        let pair = self.token_service.generate_tokens(&user).await?;
        Ok(AuthResponse::from_token_pair(pair, user))
    }

    /// Best-effort session teardown; never fails the caller
    pub async fn logout(&self, raw_token: &str) {
        match self.token_service.invalidate_refresh_token(raw_token).await {
            Ok(revoked) => {
                tracing::info!(revoked, event = "user_logged_out", "Logout processed");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    event = "logout_revocation_failed",
                    "Failed to revoke refresh token during logout"
                );
            }
        }
    }
}
