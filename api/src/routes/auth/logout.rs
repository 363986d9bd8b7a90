use actix_web::{web, HttpResponse};
use validator::Validate;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::verification::ChannelSender;

use crate::app::AppState;
use crate::dto::auth_dto::LogoutRequest;
use crate::handlers::validation_error_response;
use crate::middleware::AuthenticatedUser;

/// Handler for POST /api/v1/auth/logout
///
/// Requires a valid access token and revokes the presented refresh token.
/// Always answers 200; revoking an unknown token is a no-op.
pub async fn logout<U, V, E, S, T>(
    user: AuthenticatedUser,
    state: web::Data<AppState<U, V, E, S, T>>,
    request: web::Json<LogoutRequest>,
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

    tracing::debug!(user_id = %user.user_id, event = "logout_requested", "Processing logout");
    state.auth_service.logout(&request.refresh_token).await;

    HttpResponse::Ok().json(serde_json::json!({ "detail": "Logged out." }))
}
