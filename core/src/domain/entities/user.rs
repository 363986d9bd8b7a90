//! User entity representing a registered account in the Rently marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verification_code::Channel;

/// Role a user holds in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator
    Admin,
    /// Real-estate agent managing listings on behalf of landlords
    Agent,
    /// Property owner
    Landlord,
    /// Renter browsing and inquiring about listings
    Tenant,
}

impl UserRole {
    /// Stable string form used in tokens and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Agent => "agent",
            UserRole::Landlord => "landlord",
            UserRole::Tenant => "tenant",
        }
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique email address (stored lowercased)
    pub email: String,

    /// One-way hash of the user's password; never the raw password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Optional phone number in international format
    pub phone_number: Option<String>,

    /// Role in the marketplace
    pub role: UserRole,

    /// Whether the account is active (deactivated accounts cannot log in)
    pub is_active: bool,

    /// Whether at least one destination has been verified
    pub is_verified: bool,

    /// When the email address was verified, if ever
    pub email_verified_at: Option<DateTime<Utc>>,

    /// When the phone number was verified, if ever
    pub phone_verified_at: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, unverified user
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone_number: Option<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash,
            first_name,
            last_name,
            phone_number,
            role,
            is_active: true,
            is_verified: false,
            email_verified_at: None,
            phone_verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Marks the user verified through the given channel
    pub fn mark_verified(&mut self, channel: Channel, at: DateTime<Utc>) {
        self.is_verified = true;
        match channel {
            Channel::Email => self.email_verified_at = Some(at),
            Channel::Phone => self.phone_verified_at = Some(at),
        }
        self.updated_at = at;
    }

    /// Deactivates the account; this core never hard-deletes users
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
