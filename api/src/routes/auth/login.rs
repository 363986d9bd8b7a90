use actix_web::{web, HttpResponse};
use validator::Validate;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::verification::ChannelSender;

use crate::app::AppState;
use crate::dto::auth_dto::{LoginRequest, SessionResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/auth/login
///
/// Exchanges email and password for a token pair. Unverified accounts get a
/// 403 carrying the destinations they can verify through.
pub async fn login<U, V, E, S, T>(
    state: web::Data<AppState<U, V, E, S, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    V: VerificationCodeRepository + 'static,
    E: ChannelSender + 'static,
    S: ChannelSender + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    match state
        .auth_service
        .login(request.email.trim(), &request.password)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(SessionResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
