//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

/// In-memory user repository for tests
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with a user, bypassing uniqueness checks
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let needle = email.trim().to_lowercase();
        let users = self.users.read().await;
        let mut matches: Vec<&User> = users
            .values()
            .filter(|u| u.email.to_lowercase() == needle)
            .collect();
        matches.sort_by_key(|u| u.id);
        Ok(matches.first().cloned().cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.phone_number.as_deref() == Some(phone_number))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email.to_lowercase() == user.email.to_lowercase())
        {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;

    fn user(email: &str) -> User {
        User::new(
            email.to_string(),
            "hash".to_string(),
            "Test".to_string(),
            "User".to_string(),
            Some("+61412345678".to_string()),
            UserRole::Tenant,
        )
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let repo = MockUserRepository::new();
        repo.create(user("dup@example.com")).await.unwrap();

        let result = repo.create(user("DUP@example.com")).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::UserAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn find_by_email_is_case_insensitive() {
        let repo = MockUserRepository::new();
        let created = repo.create(user("tenant@example.com")).await.unwrap();

        let found = repo.find_by_email("  TENANT@Example.Com ").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn find_by_phone_matches_exactly() {
        let repo = MockUserRepository::new();
        let created = repo.create(user("tenant@example.com")).await.unwrap();

        let found = repo.find_by_phone("+61412345678").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
        assert!(repo.find_by_phone("+61400000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_requires_existing_user() {
        let repo = MockUserRepository::new();
        let result = repo.update(user("ghost@example.com")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
