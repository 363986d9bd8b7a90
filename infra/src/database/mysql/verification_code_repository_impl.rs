//! MySQL implementation of the VerificationCodeRepository trait.
//!
//! The single-use guarantee rests on the conditional
//! `UPDATE ... WHERE used_at IS NULL` consume: whichever confirmation commits
//! first wins, every other one sees zero affected rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::str::FromStr;
use uuid::Uuid;

use rently_core::domain::entities::user::User;
use rently_core::domain::entities::verification_code::{Channel, VerificationCode};
use rently_core::errors::DomainError;
use rently_core::repositories::VerificationCodeRepository;

/// MySQL implementation of VerificationCodeRepository
pub struct MySqlVerificationCodeRepository {
    pool: MySqlPool,
}

const CODE_COLUMNS: &str = "id, user_id, channel, destination, code_hash, created_at, sent_at, \
     expires_at, used_at, attempt_count, last_attempt_at";

impl MySqlVerificationCodeRepository {
    /// Create a new MySQL verification code repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_code(row: &sqlx::mysql::MySqlRow) -> Result<VerificationCode, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;
        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;
        let channel: String = row.try_get("channel").map_err(|e| DomainError::Internal {
            message: format!("Failed to get channel: {}", e),
        })?;

        Ok(VerificationCode {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid code UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            channel: Channel::from_str(&channel).map_err(|_| DomainError::Internal {
                message: format!("Unknown channel in database: {}", channel),
            })?,
            destination: row
                .try_get("destination")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get destination: {}", e),
                })?,
            code_hash: row.try_get("code_hash").map_err(|e| DomainError::Internal {
                message: format!("Failed to get code_hash: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            sent_at: row
                .try_get::<Option<DateTime<Utc>>, _>("sent_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get sent_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("used_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get used_at: {}", e),
                })?,
            attempt_count: row
                .try_get("attempt_count")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get attempt_count: {}", e),
                })?,
            last_attempt_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_attempt_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_attempt_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl VerificationCodeRepository for MySqlVerificationCodeRepository {
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError> {
        let query = r#"
            INSERT INTO verification_codes (
                id, user_id, channel, destination, code_hash, created_at,
                sent_at, expires_at, used_at, attempt_count, last_attempt_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(code.id.to_string())
            .bind(code.user_id.to_string())
            .bind(code.channel.as_str())
            .bind(&code.destination)
            .bind(&code.code_hash)
            .bind(code.created_at)
            .bind(code.sent_at)
            .bind(code.expires_at)
            .bind(code.used_at)
            .bind(code.attempt_count)
            .bind(code.last_attempt_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create verification code: {}", e),
            })?;

        Ok(code)
    }

    async fn find_latest_active(
        &self,
        user_id: Uuid,
        channel: Channel,
        destination: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let query = format!(
            "SELECT {} FROM verification_codes \
             WHERE user_id = ? AND channel = ? AND destination = ? \
               AND used_at IS NULL AND expires_at > ? \
             ORDER BY created_at DESC LIMIT 1",
            CODE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(channel.as_str())
            .bind(destination)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find verification code: {}", e),
            })?;

        row.map(|r| Self::row_to_code(&r)).transpose()
    }

    async fn record_attempt(&self, id: Uuid, at: DateTime<Utc>) -> Result<i32, DomainError> {
        let update = r#"
            UPDATE verification_codes
            SET attempt_count = attempt_count + 1, last_attempt_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(update)
            .bind(at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to record attempt: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "VerificationCode".to_string(),
            });
        }

        let row = sqlx::query("SELECT attempt_count FROM verification_codes WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to read attempt count: {}", e),
            })?;
        row.try_get("attempt_count")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get attempt_count: {}", e),
            })
    }

    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE verification_codes
            SET used_at = ?
            WHERE id = ? AND used_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(at)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to consume verification code: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn consume_and_mark_verified(
        &self,
        id: Uuid,
        user: User,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let consumed = sqlx::query(
            r#"
            UPDATE verification_codes
            SET used_at = ?
            WHERE id = ? AND used_at IS NULL
        "#,
        )
        .bind(at)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to consume verification code: {}", e),
        })?;

        if consumed.rows_affected() == 0 {
            // Lost the compare-and-set; dropping the transaction rolls back.
            return Ok(None);
        }

        let updated = sqlx::query(
            r#"
            UPDATE users SET
                is_verified = ?, email_verified_at = ?, phone_verified_at = ?,
                updated_at = ?
            WHERE id = ?
        "#,
        )
        .bind(user.is_verified)
        .bind(user.email_verified_at)
        .bind(user.phone_verified_at)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to mark user verified: {}", e),
        })?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit verification: {}", e),
        })?;
        Ok(Some(user))
    }
}
