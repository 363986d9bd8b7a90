//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::trait_::TokenRepository;

/// In-memory refresh token repository for tests
#[derive(Clone, Default)]
pub struct MockTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, RefreshToken>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Count tokens currently active for a user
    pub async fn active_count_for(&self, user_id: Uuid) -> usize {
        let now = Utc::now();
        self.tokens
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id && t.is_active(now))
            .count()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned())
    }

    async fn revoke(&self, token_hash: &str, at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        match tokens
            .values_mut()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoke(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_user(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut revoked = 0;
        for token in tokens
            .values_mut()
            .filter(|t| t.user_id == user_id && t.revoked_at.is_none())
        {
            token.revoke(at);
            revoked += 1;
        }
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_for(user_id: Uuid, hash: &str) -> RefreshToken {
        RefreshToken::new(user_id, hash.to_string(), 24)
    }

    #[tokio::test]
    async fn find_by_hash_returns_saved_token() {
        let repo = MockTokenRepository::new();
        let saved = repo
            .save(token_for(Uuid::new_v4(), "abc123"))
            .await
            .unwrap();

        let found = repo.find_by_hash("abc123").await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(saved.id));
        assert!(repo.find_by_hash("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revoke_is_idempotent_per_token() {
        let repo = MockTokenRepository::new();
        repo.save(token_for(Uuid::new_v4(), "abc123"))
            .await
            .unwrap();
        let now = Utc::now();

        assert!(repo.revoke("abc123", now).await.unwrap());
        assert!(!repo.revoke("abc123", now).await.unwrap());
    }

    #[tokio::test]
    async fn revoke_all_only_touches_one_user() {
        let repo = MockTokenRepository::new();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        repo.save(token_for(user_a, "a1")).await.unwrap();
        repo.save(token_for(user_a, "a2")).await.unwrap();
        repo.save(token_for(user_b, "b1")).await.unwrap();

        let revoked = repo.revoke_all_for_user(user_a, Utc::now()).await.unwrap();
        assert_eq!(revoked, 2);
        assert_eq!(repo.active_count_for(user_a).await, 0);
        assert_eq!(repo.active_count_for(user_b).await, 1);
    }
}
