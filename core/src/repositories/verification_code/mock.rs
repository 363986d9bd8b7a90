//! Mock implementation of VerificationCodeRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::domain::entities::verification_code::{Channel, VerificationCode};
use crate::errors::DomainError;
use crate::repositories::user::{MockUserRepository, UserRepository};

use super::trait_::VerificationCodeRepository;

/// In-memory verification code repository for tests.
///
/// `consume_and_mark_verified` needs somewhere to persist the user, so the
/// mock carries a user store. Fixtures that confirm codes should share one
/// via [`MockVerificationCodeRepository::with_users`].
#[derive(Clone, Default)]
pub struct MockVerificationCodeRepository {
    codes: Arc<RwLock<HashMap<Uuid, VerificationCode>>>,
    users: Arc<MockUserRepository>,
}

impl MockVerificationCodeRepository {
    /// Create a new mock repository with its own user store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository sharing an existing user store
    pub fn with_users(users: Arc<MockUserRepository>) -> Self {
        Self {
            codes: Arc::default(),
            users,
        }
    }

    /// Number of stored code rows; used to assert anti-enumeration behaviour
    pub async fn count(&self) -> usize {
        self.codes.read().await.len()
    }

    /// Fetch a stored row by id
    pub async fn get(&self, id: Uuid) -> Option<VerificationCode> {
        self.codes.read().await.get(&id).cloned()
    }

    /// Overwrite a stored row; lets tests age or exhaust codes directly
    pub async fn put(&self, code: VerificationCode) {
        self.codes.write().await.insert(code.id, code);
    }
}

#[async_trait]
impl VerificationCodeRepository for MockVerificationCodeRepository {
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError> {
        let mut codes = self.codes.write().await;
        codes.insert(code.id, code.clone());
        Ok(code)
    }

    async fn find_latest_active(
        &self,
        user_id: Uuid,
        channel: Channel,
        destination: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let codes = self.codes.read().await;
        Ok(codes
            .values()
            .filter(|c| {
                c.user_id == user_id
                    && c.channel == channel
                    && c.destination == destination
                    && !c.is_used()
                    && !c.is_expired(now)
            })
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn record_attempt(&self, id: Uuid, at: DateTime<Utc>) -> Result<i32, DomainError> {
        let mut codes = self.codes.write().await;
        let code = codes.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: "VerificationCode".to_string(),
        })?;
        code.record_attempt(at);
        Ok(code.attempt_count)
    }

    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut codes = self.codes.write().await;
        let code = codes.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: "VerificationCode".to_string(),
        })?;
        if code.is_used() {
            return Ok(false);
        }
        code.mark_used(at);
        Ok(true)
    }

    async fn consume_and_mark_verified(
        &self,
        id: Uuid,
        user: User,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        // Holding the write lock across both steps keeps the pair atomic,
        // mirroring the transactional database implementation.
        let mut codes = self.codes.write().await;
        let code = codes.get_mut(&id).ok_or_else(|| DomainError::NotFound {
            resource: "VerificationCode".to_string(),
        })?;
        if code.is_used() {
            return Ok(None);
        }
        code.mark_used(at);
        let user = self.users.update(user).await?;
        Ok(Some(user))
    }
}
