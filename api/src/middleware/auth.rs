//! Bearer-token authentication extractor.
//!
//! Handlers that need an authenticated caller take an [`AuthenticatedUser`]
//! argument. Extraction reads the `Authorization: Bearer <jwt>` header and
//! validates the token against the [`JwtDecoder`] registered as app data.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::InternalError, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use rently_core::domain::entities::token::Claims;
use rently_shared::config::JwtConfig;
use rently_shared::types::response::ErrorBody;

/// Decodes and validates access tokens at the HTTP edge
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtDecoder {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Validate a raw JWT and return its claims
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

/// The caller identity proven by a valid access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub claims: Claims,
}

fn unauthorized(detail: &str) -> actix_web::Error {
    let response = HttpResponse::Unauthorized().json(ErrorBody::new("invalid_token", detail));
    InternalError::from_response(detail.to_string(), response).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let decoder = req
        .app_data::<actix_web::web::Data<JwtDecoder>>()
        .ok_or_else(|| unauthorized("Authentication is not configured."))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header."))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Expected a bearer token."))?;

    let claims = decoder
        .decode(token.trim())
        .map_err(|_| unauthorized("Invalid or expired token."))?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| unauthorized("Invalid or expired token."))?;

    Ok(AuthenticatedUser { user_id, claims })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret".to_string(),
            ..JwtConfig::default()
        }
    }

    fn signed_token(config: &JwtConfig, user_id: Uuid) -> String {
        let claims = Claims::new_access_token(
            user_id,
            "tenant",
            true,
            config.access_token_minutes,
            &config.issuer,
            &config.audience,
        );
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn valid_bearer_token_is_accepted() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = signed_token(&config, user_id);

        let req = TestRequest::default()
            .app_data(actix_web::web::Data::new(JwtDecoder::new(&config)))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        let user = extract(&req).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.claims.role, "tenant");
    }

    #[actix_web::test]
    async fn missing_header_is_rejected() {
        let req = TestRequest::default()
            .app_data(actix_web::web::Data::new(JwtDecoder::new(&config())))
            .to_http_request();
        assert!(extract(&req).is_err());
    }

    #[actix_web::test]
    async fn tampered_token_is_rejected() {
        let config = config();
        let mut token = signed_token(&config, Uuid::new_v4());
        token.push('x');

        let req = TestRequest::default()
            .app_data(actix_web::web::Data::new(JwtDecoder::new(&config)))
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();
        assert!(extract(&req).is_err());
    }
}
