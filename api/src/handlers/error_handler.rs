//! Mapping from domain errors to HTTP responses.
//!
//! The mapping is deliberately coarse where account enumeration is a risk:
//! unknown accounts, wrong passwords and wrong codes reuse the same bodies
//! as their legitimate-failure counterparts.

use actix_web::HttpResponse;

use rently_core::domain::entities::verification_code::Channel;
use rently_core::errors::{AuthError, DomainError, TokenError};
use rently_shared::types::response::ErrorBody;

/// Convert a domain error into the corresponding HTTP response
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth) => handle_auth_error(auth),
        DomainError::Token(token) => handle_token_error(token),
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorBody::new("validation_error", message))
        }
        DomainError::ValidationErr(e) => {
            HttpResponse::BadRequest().json(ErrorBody::new("validation_error", e.to_string()))
        }
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(ErrorBody::new(
            "not_found",
            format!("{} not found", resource),
        )),
        DomainError::Internal { message } => {
            tracing::error!(error = %message, event = "internal_error", "Unhandled internal error");
            HttpResponse::InternalServerError()
                .json(ErrorBody::new("internal_error", "An internal error occurred."))
        }
    }
}

fn handle_auth_error(error: AuthError) -> HttpResponse {
    match error {
        AuthError::InvalidCredentials => HttpResponse::Unauthorized()
            .json(ErrorBody::new("invalid_credentials", "Invalid credentials.")),
        AuthError::AccountInactive => HttpResponse::Forbidden().json(ErrorBody::new(
            "account_inactive",
            "This account has been deactivated.",
        )),
        AuthError::VerificationRequired { email, phone_number } => {
            HttpResponse::Forbidden().json(serde_json::json!({
                "detail": "Account not verified. Complete verification to log in.",
                "verification_required": true,
                "email": email,
                "phone_number": phone_number,
            }))
        }
        AuthError::InvalidCode => {
            HttpResponse::BadRequest().json(ErrorBody::new("invalid_code", "Invalid code."))
        }
        AuthError::TooManyAttempts => HttpResponse::TooManyRequests().json(ErrorBody::new(
            "too_many_attempts",
            "Too many attempts. Request a new code.",
        )),
        AuthError::UserAlreadyExists => HttpResponse::BadRequest().json(ErrorBody::new(
            "user_exists",
            "An account with this email already exists.",
        )),
    }
}

fn handle_token_error(error: TokenError) -> HttpResponse {
    let detail = match error {
        TokenError::TokenExpired => "Token has expired.",
        TokenError::RefreshTokenExpired => "Refresh token has expired.",
        TokenError::TokenRevoked => "Token has been revoked.",
        TokenError::InvalidTokenFormat | TokenError::InvalidRefreshToken => "Invalid token.",
        TokenError::TokenGenerationFailed => {
            return HttpResponse::InternalServerError()
                .json(ErrorBody::new("internal_error", "An internal error occurred."));
        }
    };
    HttpResponse::Unauthorized().json(ErrorBody::new("invalid_token", detail))
}

/// 400 response when a verify request omits the field its channel requires
pub fn missing_destination_response(channel: Channel) -> HttpResponse {
    let detail = match channel {
        Channel::Email => "email is required for the email channel",
        Channel::Phone => "phone_number is required for the phone channel",
    };
    HttpResponse::BadRequest().json(ErrorBody::new("validation_error", detail))
}

/// 400 response for failed request validation
pub fn validation_error_response(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(
        ErrorBody::new("validation_error", "Invalid request data")
            .with_detail("validation_errors", serde_json::json!(errors)),
    )
}
