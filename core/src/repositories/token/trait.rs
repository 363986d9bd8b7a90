//! Refresh token repository trait.
//!
//! Tokens are looked up by the SHA-256 hex digest of the opaque token string;
//! the raw token never reaches storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for refresh token persistence
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a newly issued refresh token
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Look up a token by its stored hash, revoked or not
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Revoke the token with the given hash.
    ///
    /// # Returns
    /// * `Ok(true)` - The token existed and is now revoked
    /// * `Ok(false)` - No such token, or it was already revoked
    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke every active token belonging to a user; returns how many
    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError>;
}
