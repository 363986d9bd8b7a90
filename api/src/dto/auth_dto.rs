//! Authentication DTOs with request validation

use serde::{Deserialize, Serialize};
use validator::Validate;

use rently_core::domain::entities::user::{User, UserRole};
use rently_core::domain::entities::verification_code::Channel;
use rently_core::domain::value_objects::AuthResponse;

/// Request body for POST /api/v1/auth/register
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 7, max = 16, message = "Phone number must be 7-16 characters"))]
    pub phone_number: Option<String>,

    pub role: UserRole,

    /// Preferred verification channel; defaults to email
    pub verify_via: Option<Channel>,
}

/// Request body for POST /api/v1/auth/login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for POST /api/v1/auth/verify/start.
///
/// The destination travels in the field matching the channel: `email` for the
/// email channel, `phone_number` for the phone channel.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyStartRequest {
    pub channel: Channel,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 7, max = 16, message = "Phone number must be 7-16 characters"))]
    pub phone_number: Option<String>,
}

impl VerifyStartRequest {
    /// The destination matching the requested channel, if present
    pub fn destination(&self) -> Option<&str> {
        match self.channel {
            Channel::Email => self.email.as_deref(),
            Channel::Phone => self.phone_number.as_deref(),
        }
    }
}

/// Request body for POST /api/v1/auth/verify/confirm.
///
/// Same destination fields as [`VerifyStartRequest`], plus the code.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyConfirmRequest {
    pub channel: Channel,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(length(min = 7, max = 16, message = "Phone number must be 7-16 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(min = 4, max = 10, message = "Code must be 4-10 digits"))]
    pub code: String,
}

impl VerifyConfirmRequest {
    /// The destination matching the requested channel, if present
    pub fn destination(&self) -> Option<&str> {
        match self.channel {
            Channel::Email => self.email.as_deref(),
            Channel::Phone => self.phone_number.as_deref(),
        }
    }
}

/// Request body for POST /api/v1/auth/refresh
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request body for POST /api/v1/auth/logout
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Response for a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub detail: String,
    pub verification_required: bool,
    pub channel: Channel,
    /// Masked destination the code was sent to
    pub destination: String,
}

/// Response carrying a fresh session
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: User,
}

impl From<AuthResponse> for SessionResponse {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            user: response.user,
        }
    }
}

/// Response for verification start; channel and destination are present only
/// when a code was actually sent
#[derive(Debug, Clone, Serialize)]
pub struct VerifyStartResponse {
    pub detail: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Response for a successful verification confirmation
#[derive(Debug, Clone, Serialize)]
pub struct VerifyConfirmResponse {
    pub detail: String,
    pub verified: bool,

    #[serde(flatten)]
    pub session: SessionResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_validation() {
        let valid = RegisterRequest {
            email: "tenant@example.com".to_string(),
            password: "s3cret-password".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone_number: Some("+15550001111".to_string()),
            role: UserRole::Tenant,
            verify_via: None,
        };
        assert!(valid.validate().is_ok());

        let mut bad_email = valid.clone();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = valid.clone();
        short_password.password = "short".to_string();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn confirm_request_rejects_out_of_range_codes() {
        let request = VerifyConfirmRequest {
            channel: Channel::Email,
            email: Some("tenant@example.com".to_string()),
            phone_number: None,
            code: "123".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn channel_deserializes_from_lowercase() {
        let request: VerifyStartRequest = serde_json::from_value(serde_json::json!({
            "channel": "phone",
            "phone_number": "+15550001111"
        }))
        .unwrap();
        assert_eq!(request.channel, Channel::Phone);
        assert_eq!(request.destination(), Some("+15550001111"));
    }

    #[test]
    fn destination_follows_the_channel() {
        let request: VerifyStartRequest = serde_json::from_value(serde_json::json!({
            "channel": "email",
            "phone_number": "+15550001111"
        }))
        .unwrap();
        // The email channel ignores a phone number.
        assert_eq!(request.destination(), None);
    }
}
