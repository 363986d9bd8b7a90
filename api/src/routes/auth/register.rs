use actix_web::{web, HttpResponse};
use validator::Validate;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::auth::RegisterData;
use rently_core::services::verification::ChannelSender;

use crate::app::AppState;
use crate::dto::auth_dto::{RegisterRequest, RegisterResponse};
use crate::handlers::{handle_domain_error, validation_error_response};

/// Handler for POST /api/v1/auth/register
///
/// Creates an unverified account and sends the first verification code.
/// The response reveals only a masked destination.
pub async fn register<U, V, E, S, T>(
    state: web::Data<AppState<U, V, E, S, T>>,
    request: web::Json<RegisterRequest>,
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

    let request = request.into_inner();
    let data = RegisterData {
        email: request.email,
        password: request.password,
        first_name: request.first_name,
        last_name: request.last_name,
        phone_number: request.phone_number,
        role: request.role,
        verify_via: request.verify_via,
    };

    match state.auth_service.register(data).await {
        Ok(outcome) => HttpResponse::Created().json(RegisterResponse {
            detail: "Account created. Check your inbox for a verification code.".to_string(),
            verification_required: true,
            channel: outcome.channel,
            destination: outcome.masked_destination,
        }),
        Err(error) => handle_domain_error(error),
    }
}
