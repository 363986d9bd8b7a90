use actix_web::{web, HttpResponse};
use validator::Validate;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::verification::ChannelSender;

use crate::app::AppState;
use crate::dto::auth_dto::{SessionResponse, VerifyConfirmRequest, VerifyConfirmResponse};
use crate::handlers::{handle_domain_error, missing_destination_response, validation_error_response};

/// Handler for POST /api/v1/auth/verify/confirm
///
/// Confirms a one-time code and opens the first session for the account.
pub async fn verify_confirm<U, V, E, S, T>(
    state: web::Data<AppState<U, V, E, S, T>>,
    request: web::Json<VerifyConfirmRequest>,
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
    let destination = match request.destination() {
        Some(destination) => destination.to_string(),
        None => return missing_destination_response(request.channel),
    };

    match state
        .auth_service
        .confirm_verification(request.channel, destination.trim(), &request.code)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(VerifyConfirmResponse {
            detail: "Account verified.".to_string(),
            verified: true,
            session: SessionResponse::from(response),
        }),
        Err(error) => handle_domain_error(error),
    }
}
