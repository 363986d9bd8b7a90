//! Error taxonomy for authentication, verification and token operations.
//!
//! Unknown-account outcomes are deliberately indistinguishable from
//! wrong-credential and wrong-code outcomes: `InvalidCredentials` and
//! `InvalidCode` cover both, so responses never reveal whether an account
//! exists. This anti-enumeration property is a requirement, not an accident.

use thiserror::Error;

/// Authentication and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The account has been deactivated
    #[error("Account is inactive")]
    AccountInactive,

    /// Password was correct but the account is not verified yet. Carries the
    /// unmasked destinations (the caller already proved the password) so the
    /// client can offer a channel choice.
    #[error("Account not verified")]
    VerificationRequired {
        email: String,
        phone_number: Option<String>,
    },

    /// Wrong code, expired code, exhausted code, or unknown account;
    /// deliberately a single variant
    #[error("Invalid code")]
    InvalidCode,

    /// The live code has burned through its attempt budget; a new code must
    /// be requested explicitly
    #[error("Too many attempts")]
    TooManyAttempts,

    /// An account with this email already exists
    #[error("User already exists")]
    UserAlreadyExists,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid email")]
    InvalidEmail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_has_single_message() {
        // Unknown user and wrong password must render identically.
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn verification_required_carries_destinations() {
        let err = AuthError::VerificationRequired {
            email: "tenant@example.com".to_string(),
            phone_number: Some("+211912345678".to_string()),
        };
        match err {
            AuthError::VerificationRequired { email, phone_number } => {
                assert_eq!(email, "tenant@example.com");
                assert_eq!(phone_number.as_deref(), Some("+211912345678"));
            }
            _ => unreachable!(),
        }
    }
}
