//! Rently API server entry point

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use rently_api::app::{self, AppState};
use rently_api::middleware::JwtDecoder;
use rently_core::services::auth::AuthService;
use rently_core::services::token::{TokenService, TokenServiceConfig};
use rently_core::services::verification::{ChannelSender, VerificationConfig, VerificationService};
use rently_infra::database::{
    create_pool, MySqlTokenRepository, MySqlUserRepository, MySqlVerificationCodeRepository,
};
use rently_infra::email::SmtpEmailSender;
use rently_infra::sms::MockSmsSender;
use rently_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if config.jwt.is_using_default_secret() {
        tracing::warn!(
            event = "default_jwt_secret",
            "JWT_SECRET is not set; using the default secret. Do not run this in production."
        );
    }

    let pool = create_pool(&config.database).await?;
    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));
    let code_repository = Arc::new(MySqlVerificationCodeRepository::new(pool.clone()));
    let token_repository = Arc::new(MySqlTokenRepository::new(pool));

    let email_sender = Arc::new(SmtpEmailSender::from_env()?);
    let sms_sender = Arc::new(select_sms_provider()?);

    let verification = Arc::new(VerificationService::new(
        user_repository.clone(),
        code_repository,
        email_sender,
        sms_sender,
        VerificationConfig {
            code_length: config.verification.code_length,
            ttl_minutes: config.verification.ttl_minutes,
            max_attempts: config.verification.max_attempts,
        },
    ));
    let token_service = Arc::new(TokenService::new(
        token_repository,
        TokenServiceConfig {
            jwt_secret: config.jwt.secret.clone(),
            access_token_minutes: config.jwt.access_token_minutes,
            refresh_token_hours: config.jwt.refresh_token_hours,
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.audience.clone(),
        },
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        verification,
        token_service,
    ));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, event = "server_starting", "Starting Rently API");

    let server_config = config.server.clone();
    let jwt_config = config.jwt.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(app::cors_policy(&server_config))
            .app_data(web::Data::new(AppState::new(auth_service.clone())))
            .app_data(web::Data::new(JwtDecoder::new(&jwt_config)))
            .configure(
                app::configure::<
                    MySqlUserRepository,
                    MySqlVerificationCodeRepository,
                    SmtpEmailSender,
                    Arc<dyn ChannelSender>,
                    MySqlTokenRepository,
                >,
            )
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}

/// Pick the SMS backend from the environment. Defaults to the logging mock so
/// local setups work without provider credentials.
fn select_sms_provider() -> anyhow::Result<Arc<dyn ChannelSender>> {
    match std::env::var("SMS_PROVIDER").as_deref() {
        #[cfg(feature = "twilio-sms")]
        Ok("twilio") => {
            let sender = rently_infra::sms::TwilioSmsSender::from_env()?;
            Ok(Arc::new(sender))
        }
        Ok(other) if other != "mock" => {
            anyhow::bail!("unsupported SMS_PROVIDER: {other}");
        }
        _ => Ok(Arc::new(MockSmsSender::new())),
    }
}
