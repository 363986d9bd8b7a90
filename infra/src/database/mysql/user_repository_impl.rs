//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rently_core::domain::entities::user::{User, UserRole};
use rently_core::errors::{AuthError, DomainError};
use rently_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone_number, \
     role, is_active, is_verified, email_verified_at, phone_verified_at, created_at, updated_at";

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn parse_role(raw: &str) -> Result<UserRole, DomainError> {
        match raw {
            "admin" => Ok(UserRole::Admin),
            "agent" => Ok(UserRole::Agent),
            "landlord" => Ok(UserRole::Landlord),
            "tenant" => Ok(UserRole::Tenant),
            other => Err(DomainError::Internal {
                message: format!("Unknown user role in database: {}", other),
            }),
        }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let role: String = row.try_get("role").map_err(|e| DomainError::Internal {
            message: format!("Failed to get role: {}", e),
        })?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("Failed to get email: {}", e),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get password_hash: {}", e),
                })?,
            first_name: row
                .try_get("first_name")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get first_name: {}", e),
                })?,
            last_name: row
                .try_get("last_name")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_name: {}", e),
                })?,
            phone_number: row
                .try_get("phone_number")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get phone_number: {}", e),
                })?,
            role: Self::parse_role(&role)?,
            is_active: row.try_get("is_active").map_err(|e| DomainError::Internal {
                message: format!("Failed to get is_active: {}", e),
            })?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get is_verified: {}", e),
                })?,
            email_verified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("email_verified_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get email_verified_at: {}", e),
                })?,
            phone_verified_at: row
                .try_get::<Option<DateTime<Utc>>, _>("phone_verified_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get phone_verified_at: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by id: {}", e),
            })?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        // id ordering keeps the result deterministic should duplicates slip in.
        let query = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER(?) ORDER BY id LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by email: {}", e),
            })?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE phone_number = ? ORDER BY id LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find user by phone: {}", e),
            })?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name, phone_number,
                role, is_active, is_verified, email_verified_at, phone_verified_at,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone_number)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.is_verified)
            .bind(user.email_verified_at)
            .bind(user.phone_verified_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(user),
            // Unique index on email.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DomainError::Auth(AuthError::UserAlreadyExists))
            }
            Err(e) => Err(DomainError::Internal {
                message: format!("Failed to create user: {}", e),
            }),
        }
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            UPDATE users SET
                email = ?, password_hash = ?, first_name = ?, last_name = ?,
                phone_number = ?, role = ?, is_active = ?, is_verified = ?,
                email_verified_at = ?, phone_verified_at = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone_number)
            .bind(user.role.as_str())
            .bind(user.is_active)
            .bind(user.is_verified)
            .bind(user.email_verified_at)
            .bind(user.phone_verified_at)
            .bind(user.updated_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to update user: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }
        Ok(user)
    }
}
