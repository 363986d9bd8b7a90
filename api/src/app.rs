//! Application state and route wiring.
//!
//! The state is generic over the repository and sender traits so route
//! handlers can be exercised against in-memory implementations in tests and
//! against MySQL, SMTP and an SMS provider in production.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::web;

use rently_core::repositories::{TokenRepository, UserRepository, VerificationCodeRepository};
use rently_core::services::auth::AuthService;
use rently_core::services::verification::ChannelSender;
use rently_shared::config::ServerConfig;

use crate::handlers;
use crate::routes;

/// Shared services handed to every route handler
pub struct AppState<U, V, E, S, T>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    E: ChannelSender,
    S: ChannelSender,
    T: TokenRepository,
{
    pub auth_service: Arc<AuthService<U, V, E, S, T>>,
}

impl<U, V, E, S, T> AppState<U, V, E, S, T>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    E: ChannelSender,
    S: ChannelSender,
    T: TokenRepository,
{
    pub fn new(auth_service: Arc<AuthService<U, V, E, S, T>>) -> Self {
        Self { auth_service }
    }
}

/// Register all API routes
pub fn configure<U, V, E, S, T>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    V: VerificationCodeRepository + 'static,
    E: ChannelSender + 'static,
    S: ChannelSender + 'static,
    T: TokenRepository + 'static,
{
    cfg.route("/health", web::get().to(handlers::health));
    cfg.service(
        web::scope("/api/v1/auth")
            .route("/register", web::post().to(routes::auth::register::<U, V, E, S, T>))
            .route("/login", web::post().to(routes::auth::login::<U, V, E, S, T>))
            .route(
                "/verify/start",
                web::post().to(routes::auth::verify_start::<U, V, E, S, T>),
            )
            .route(
                "/verify/confirm",
                web::post().to(routes::auth::verify_confirm::<U, V, E, S, T>),
            )
            .route("/refresh", web::post().to(routes::auth::refresh::<U, V, E, S, T>))
            .route("/logout", web::post().to(routes::auth::logout::<U, V, E, S, T>)),
    );
}

/// Build the CORS policy from configuration. An empty origin list allows any
/// origin, intended for local development only.
pub fn cors_policy(config: &ServerConfig) -> Cors {
    if config.cors_origins.is_empty() {
        Cors::permissive()
    } else {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allow_any_header()
            .max_age(3600);
        for origin in &config.cors_origins {
            cors = cors.allowed_origin(origin);
        }
        cors
    }
}
