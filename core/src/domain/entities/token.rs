//! Session token entities: JWT claims, token pairs and stored refresh tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,

    /// Role of the user at issuance time
    pub role: String,

    /// Whether the user was verified at issuance time
    pub is_verified: bool,

    /// Issued-at (seconds since epoch)
    pub iat: i64,

    /// Expiry (seconds since epoch)
    pub exp: i64,

    /// Not-before (seconds since epoch)
    pub nbf: i64,

    /// Unique token id
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Builds access-token claims for a user
    pub fn new_access_token(
        user_id: Uuid,
        role: &str,
        is_verified: bool,
        lifetime_minutes: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expires = now + Duration::minutes(lifetime_minutes);
        Self {
            sub: user_id.to_string(),
            role: role.to_string(),
            is_verified,
            iat: now.timestamp(),
            exp: expires.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }

    /// Parses the subject claim back into a user id
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// An access + refresh token pair handed to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed JWT access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Server-side record of an issued refresh token. Only a sha256 hash of the
/// opaque token string is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the stored token
    pub id: Uuid,

    /// The user this token belongs to
    pub user_id: Uuid,

    /// sha256 hex digest of the opaque token string
    pub token_hash: String,

    /// When the token was issued
    pub created_at: DateTime<Utc>,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// When the token was revoked, if it was
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a new refresh token record expiring `lifetime_hours` from now
    pub fn new(user_id: Uuid, token_hash: String, lifetime_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: now,
            expires_at: now + Duration::hours(lifetime_hours),
            revoked_at: None,
        }
    }

    /// Whether the token can still be exchanged at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }

    /// Revokes the token
    pub fn revoke(&mut self, at: DateTime<Utc>) {
        self.revoked_at = Some(at);
    }
}
