//! Verification code entity: an ephemeral credential proving control of a
//! destination (email address or phone number). Only a one-way hash of the
//! numeric code is ever stored.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery medium for a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Code delivered to an email address
    Email,
    /// Code delivered to a phone number via SMS
    Phone,
}

impl Channel {
    /// Stable string form used in API payloads and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Phone => "phone",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Channel::Email),
            "phone" => Ok(Channel::Phone),
            _ => Err(()),
        }
    }
}

/// A single one-time verification code issued for a (user, channel, destination)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Unique identifier for this code row
    pub id: Uuid,

    /// The user this code belongs to
    pub user_id: Uuid,

    /// Channel the code was issued for
    pub channel: Channel,

    /// The concrete destination the code was sent to. Denormalized on purpose:
    /// a code stays valid for the destination it was issued against even if
    /// the user's profile destination changes afterwards.
    pub destination: String,

    /// One-way salted hash of the numeric code
    pub code_hash: String,

    /// When the code row was created
    pub created_at: DateTime<Utc>,

    /// When a send was attempted, if one was
    pub sent_at: Option<DateTime<Utc>>,

    /// When the code stops being valid
    pub expires_at: DateTime<Utc>,

    /// When the code was consumed; set at most once
    pub used_at: Option<DateTime<Utc>>,

    /// Number of confirmation attempts made against this code
    pub attempt_count: i32,

    /// When the last confirmation attempt happened
    pub last_attempt_at: Option<DateTime<Utc>>,
}

impl VerificationCode {
    /// Creates a new code row expiring `ttl_minutes` from now
    pub fn new(
        user_id: Uuid,
        channel: Channel,
        destination: String,
        code_hash: String,
        ttl_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            channel,
            destination,
            code_hash,
            created_at: now,
            sent_at: None,
            expires_at: now + Duration::minutes(ttl_minutes),
            used_at: None,
            attempt_count: 0,
            last_attempt_at: None,
        }
    }

    /// Whether the code has been consumed
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Whether the code has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// A code is usable iff it is unused, unexpired and under the attempt ceiling
    pub fn is_usable(&self, now: DateTime<Utc>, max_attempts: i32) -> bool {
        !self.is_used() && !self.is_expired(now) && self.attempt_count < max_attempts
    }

    /// Records one confirmation attempt; the counter only ever grows
    pub fn record_attempt(&mut self, at: DateTime<Utc>) {
        self.attempt_count += 1;
        self.last_attempt_at = Some(at);
    }

    /// Marks the code consumed; callers must ensure this happens at most once
    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        debug_assert!(self.used_at.is_none());
        self.used_at = Some(at);
    }
}
