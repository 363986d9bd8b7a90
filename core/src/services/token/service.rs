//! Main token issuer implementation

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Issues and validates access and refresh tokens
///
/// Access tokens are HS256 JWTs; refresh tokens are opaque random strings
/// whose sha256 digest is the only thing that reaches storage.
pub struct TokenService<R: TokenRepository> {
    repository: Arc<R>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: TokenRepository> TokenService<R> {
    /// Create a new token issuer
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Generate an access + refresh pair for a user
    pub async fn generate_tokens(&self, user: &User) -> DomainResult<TokenPair> {
        let claims = Claims::new_access_token(
            user.id,
            user.role.as_str(),
            user.is_verified,
            self.config.access_token_minutes,
            &self.config.issuer,
            &self.config.audience,
        );
        let access_token = self.encode_jwt(&claims)?;
        let refresh_token = self.generate_refresh_token(user.id).await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_minutes * 60,
        ))
    }

    /// Verify an access token's signature and registered claims
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    DomainError::Token(TokenError::TokenExpired)
                }
                _ => DomainError::Token(TokenError::InvalidTokenFormat),
            })
    }

    /// Validate a raw refresh token against storage.
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The stored record; still active
    /// * `Err(TokenError::InvalidRefreshToken)` - Unknown token
    /// * `Err(TokenError::TokenRevoked)` - Token was revoked
    /// * `Err(TokenError::RefreshTokenExpired)` - Token aged out
    pub async fn validate_refresh_token(&self, raw_token: &str) -> DomainResult<RefreshToken> {
        let token_hash = Self::hash_token(raw_token);
        let stored = self
            .repository
            .find_by_hash(&token_hash)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        if stored.revoked_at.is_some() {
            return Err(DomainError::Token(TokenError::TokenRevoked));
        }
        if stored.expires_at <= Utc::now() {
            return Err(DomainError::Token(TokenError::RefreshTokenExpired));
        }
        Ok(stored)
    }

    /// Revoke a raw refresh token; best-effort.
    ///
    /// Returns whether a live token was actually revoked.
    pub async fn invalidate_refresh_token(&self, raw_token: &str) -> DomainResult<bool> {
        let token_hash = Self::hash_token(raw_token);
        self.repository.revoke(&token_hash, Utc::now()).await
    }

    /// Revoke every live refresh token for a user; returns how many
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> DomainResult<u64> {
        self.repository.revoke_all_for_user(user_id, Utc::now()).await
    }

    /// Generate, hash and store a fresh opaque refresh token
    async fn generate_refresh_token(&self, user_id: Uuid) -> DomainResult<String> {
        let mut rng = rand::thread_rng();
        let token_string: String = (0..32)
            .map(|_| {
                let idx = rng.gen_range(0..62);
                match idx {
                    0..10 => (b'0' + idx) as char,
                    10..36 => (b'a' + idx - 10) as char,
                    36..62 => (b'A' + idx - 36) as char,
                    _ => unreachable!(),
                }
            })
            .collect();

        let token_hash = Self::hash_token(&token_string);
        let refresh_token = RefreshToken::new(user_id, token_hash, self.config.refresh_token_hours);
        self.repository
            .save(refresh_token)
            .await
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))?;

        Ok(token_string)
    }

    fn hash_token(raw_token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw_token.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;
    use crate::repositories::token::MockTokenRepository;

    fn service() -> TokenService<MockTokenRepository> {
        TokenService::new(
            Arc::new(MockTokenRepository::new()),
            TokenServiceConfig {
                jwt_secret: "test-secret".to_string(),
                ..Default::default()
            },
        )
    }

    fn verified_user() -> User {
        let mut user = User::new(
            "tenant@example.com".to_string(),
            "hash".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            None,
            UserRole::Tenant,
        );
        user.is_verified = true;
        user
    }

    #[tokio::test]
    async fn generated_access_token_round_trips() {
        let service = service();
        let user = verified_user();

        let pair = service.generate_tokens(&user).await.unwrap();
        assert_eq!(pair.expires_in, 3600);

        let claims = service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(user.id));
        assert_eq!(claims.role, "tenant");
        assert!(claims.is_verified);
        assert_eq!(claims.iss, "rently");
        assert_eq!(claims.aud, "rently-api");
    }

    #[tokio::test]
    async fn refresh_token_is_opaque_and_stored_hashed() {
        let repository = Arc::new(MockTokenRepository::new());
        let service = TokenService::new(
            repository.clone(),
            TokenServiceConfig {
                jwt_secret: "test-secret".to_string(),
                ..Default::default()
            },
        );
        let user = verified_user();

        let pair = service.generate_tokens(&user).await.unwrap();
        assert_eq!(pair.refresh_token.len(), 32);
        assert!(pair.refresh_token.chars().all(|c| c.is_ascii_alphanumeric()));

        // The raw string is not in storage; its digest is.
        assert!(repository
            .find_by_hash(&pair.refresh_token)
            .await
            .unwrap()
            .is_none());
        let stored = service.validate_refresh_token(&pair.refresh_token).await.unwrap();
        assert_eq!(stored.user_id, user.id);
    }

    #[tokio::test]
    async fn tampered_access_token_is_rejected() {
        let service = service();
        let pair = service.generate_tokens(&verified_user()).await.unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.push('x');
        assert!(matches!(
            service.verify_access_token(&tampered),
            Err(DomainError::Token(TokenError::InvalidTokenFormat))
        ));

        let other = TokenService::new(
            Arc::new(MockTokenRepository::new()),
            TokenServiceConfig {
                jwt_secret: "different-secret".to_string(),
                ..Default::default()
            },
        );
        assert!(matches!(
            other.verify_access_token(&pair.access_token),
            Err(DomainError::Token(TokenError::InvalidTokenFormat))
        ));
    }

    #[tokio::test]
    async fn expired_access_token_is_rejected() {
        let service = TokenService::new(
            Arc::new(MockTokenRepository::new()),
            TokenServiceConfig {
                jwt_secret: "test-secret".to_string(),
                // Beyond the default decoding leeway of 60 seconds.
                access_token_minutes: -5,
                ..Default::default()
            },
        );
        let pair = service.generate_tokens(&verified_user()).await.unwrap();

        assert!(matches!(
            service.verify_access_token(&pair.access_token),
            Err(DomainError::Token(TokenError::TokenExpired))
        ));
    }

    #[tokio::test]
    async fn unknown_refresh_token_is_invalid() {
        let service = service();
        assert!(matches!(
            service.validate_refresh_token("no-such-token").await,
            Err(DomainError::Token(TokenError::InvalidRefreshToken))
        ));
    }

    #[tokio::test]
    async fn revoked_refresh_token_is_rejected() {
        let service = service();
        let pair = service.generate_tokens(&verified_user()).await.unwrap();

        assert!(service
            .invalidate_refresh_token(&pair.refresh_token)
            .await
            .unwrap());
        assert!(matches!(
            service.validate_refresh_token(&pair.refresh_token).await,
            Err(DomainError::Token(TokenError::TokenRevoked))
        ));
        // Second revocation is a no-op.
        assert!(!service
            .invalidate_refresh_token(&pair.refresh_token)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn expired_refresh_token_is_rejected() {
        let repository = Arc::new(MockTokenRepository::new());
        let service = TokenService::new(
            repository.clone(),
            TokenServiceConfig {
                jwt_secret: "test-secret".to_string(),
                refresh_token_hours: -1,
                ..Default::default()
            },
        );
        let pair = service.generate_tokens(&verified_user()).await.unwrap();

        assert!(matches!(
            service.validate_refresh_token(&pair.refresh_token).await,
            Err(DomainError::Token(TokenError::RefreshTokenExpired))
        ));
    }
}
