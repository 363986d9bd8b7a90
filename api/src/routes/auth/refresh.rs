use actix_web::{web, HttpResponse};
use validator::Validate;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::verification::ChannelSender;

use crate::app::AppState;
use crate::dto::auth_dto::{RefreshRequest, SessionResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token: the presented token is revoked and a fresh pair
/// is issued.
pub async fn refresh<U, V, E, S, T>(
    state: web::Data<AppState<U, V, E, S, T>>,
    request: web::Json<RefreshRequest>,
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

    match state.auth_service.refresh_token(&request.refresh_token).await {
        Ok(response) => HttpResponse::Ok().json(SessionResponse::from(response)),
        Err(error) => handle_domain_error(error),
    }
}
