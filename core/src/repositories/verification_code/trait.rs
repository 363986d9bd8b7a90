//! Verification code repository trait.
//!
//! The mutating operations are shaped so the single-use and bounded-attempt
//! invariants survive concurrent confirmations: `record_attempt` is an atomic
//! increment and `consume` is a compare-and-set on `used_at`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::domain::entities::verification_code::{Channel, VerificationCode};
use crate::errors::DomainError;

/// Repository trait for VerificationCode persistence
#[async_trait]
pub trait VerificationCodeRepository: Send + Sync {
    /// Persist a freshly issued code
    async fn create(&self, code: VerificationCode) -> Result<VerificationCode, DomainError>;

    /// Find the most recently created unused, unexpired code for the key.
    ///
    /// Attempt-ceiling filtering is the caller's job: an exhausted code must
    /// still be found so the confirmation can answer "too many attempts"
    /// instead of "invalid code".
    async fn find_latest_active(
        &self,
        user_id: Uuid,
        channel: Channel,
        destination: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, DomainError>;

    /// Atomically increment the attempt counter and stamp `last_attempt_at`.
    ///
    /// Persisted regardless of whether the attempt ends up matching, so
    /// repeated wrong guesses burn attempts. Returns the new counter value.
    async fn record_attempt(&self, id: Uuid, at: DateTime<Utc>) -> Result<i32, DomainError>;

    /// Compare-and-set `used_at`: succeeds only if the code is still unused.
    ///
    /// # Returns
    /// * `Ok(true)` - This caller consumed the code
    /// * `Ok(false)` - A concurrent confirmation got there first
    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Consume the code and persist the verified user as one atomic unit.
    ///
    /// Keeps the compare-and-set on `used_at`; the user write happens only if
    /// this caller wins it, and both writes commit or neither does. A crash
    /// cannot leave the code consumed with the user still unverified.
    ///
    /// # Returns
    /// * `Ok(Some(user))` - Code consumed, user persisted
    /// * `Ok(None)` - A concurrent confirmation got there first, nothing written
    async fn consume_and_mark_verified(
        &self,
        id: Uuid,
        user: User,
        at: DateTime<Utc>,
    ) -> Result<Option<User>, DomainError>;
}
