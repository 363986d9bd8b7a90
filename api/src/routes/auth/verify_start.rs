use actix_web::{web, HttpResponse};
use validator::Validate;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::verification::ChannelSender;

use crate::app::AppState;
use crate::dto::auth_dto::{VerifyStartRequest, VerifyStartResponse};
use crate::handlers::{handle_domain_error, missing_destination_response, validation_error_response};

/// Handler for POST /api/v1/auth/verify/start
///
/// Always answers 200 with the same generic detail so the endpoint cannot be
/// used to probe which destinations have accounts.
pub async fn verify_start<U, V, E, S, T>(
    state: web::Data<AppState<U, V, E, S, T>>,
    request: web::Json<VerifyStartRequest>,
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

    let detail = "If the account exists and is unverified, a code has been sent.".to_string();
    match state
        .auth_service
        .start_verification(request.channel, destination.trim())
        .await
    {
        Ok(Some(masked)) => HttpResponse::Ok().json(VerifyStartResponse {
            detail,
            channel: Some(request.channel),
            destination: Some(masked),
        }),
        Ok(None) => HttpResponse::Ok().json(VerifyStartResponse {
            detail,
            channel: None,
            destination: None,
        }),
        Err(error) => handle_domain_error(error),
    }
}
