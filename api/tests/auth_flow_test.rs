//! Route-level tests over the full auth flow, backed by in-memory
//! repositories and a recording outbox instead of real transports.

use std::sync::Arc;

use actix_web::{test, web, App};
use async_trait::async_trait;
use tokio::sync::RwLock;

use rently_api::app::{self, AppState};
use rently_api::middleware::JwtDecoder;
use rently_core::errors::DomainError;
use rently_core::repositories::{
    MockTokenRepository, MockUserRepository, MockVerificationCodeRepository,
};
use rently_core::services::auth::AuthService;
use rently_core::services::token::{TokenService, TokenServiceConfig};
use rently_core::services::verification::{ChannelSender, VerificationConfig, VerificationService};
use rently_shared::config::JwtConfig;

/// Captures outbound messages so tests can read the code out of the body
#[derive(Default)]
struct Outbox {
    messages: RwLock<Vec<String>>,
}

impl Outbox {
    /// The longest digit run in the latest message body. Durations in the
    /// message text are shorter than any code.
    async fn last_code(&self) -> String {
        let messages = self.messages.read().await;
        let body = messages.last().expect("no message was sent");
        let mut best = String::new();
        let mut run = String::new();
        for c in body.chars() {
            if c.is_ascii_digit() {
                run.push(c);
            } else {
                run.clear();
            }
            if run.len() > best.len() {
                best = run.clone();
            }
        }
        best
    }
}

#[async_trait]
impl ChannelSender for Outbox {
    async fn send(&self, _destination: &str, body: &str) -> Result<(), DomainError> {
        self.messages.write().await.push(body.to_string());
        Ok(())
    }
}

type TestState = AppState<
    MockUserRepository,
    MockVerificationCodeRepository,
    Outbox,
    Outbox,
    MockTokenRepository,
>;

struct Harness {
    state: web::Data<TestState>,
    jwt: JwtConfig,
    email_outbox: Arc<Outbox>,
}

fn harness() -> Harness {
    let jwt = JwtConfig {
        secret: "route-test-secret".to_string(),
        ..JwtConfig::default()
    };

    let user_repository = Arc::new(MockUserRepository::new());
    let code_repository = Arc::new(MockVerificationCodeRepository::with_users(
        user_repository.clone(),
    ));
    let token_repository = Arc::new(MockTokenRepository::new());
    let email_outbox = Arc::new(Outbox::default());
    let sms_outbox = Arc::new(Outbox::default());

    let verification = Arc::new(VerificationService::new(
        user_repository.clone(),
        code_repository,
        email_outbox.clone(),
        sms_outbox,
        VerificationConfig::default(),
    ));
    let token_service = Arc::new(TokenService::new(
        token_repository,
        TokenServiceConfig {
            jwt_secret: jwt.secret.clone(),
            ..TokenServiceConfig::default()
        },
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        verification,
        token_service,
    ));

    Harness {
        state: web::Data::new(AppState::new(auth_service)),
        jwt,
        email_outbox,
    }
}

macro_rules! test_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.state.clone())
                .app_data(web::Data::new(JwtDecoder::new(&$harness.jwt)))
                .configure(
                    app::configure::<
                        MockUserRepository,
                        MockVerificationCodeRepository,
                        Outbox,
                        Outbox,
                        MockTokenRepository,
                    >,
                ),
        )
        .await
    };
}

fn register_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": "s3cret-password",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone_number": "+15550001111",
        "role": "tenant"
    })
}

#[actix_web::test]
async fn register_confirm_login_flow() {
    let harness = harness();
    let app = test_app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(register_body("ada@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["verification_required"], true);
    assert_eq!(body["channel"], "email");
    assert_eq!(body["destination"], "a*a@example.com");

    // Login before verification is refused with the unmasked destinations.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "s3cret-password"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["verification_required"], true);
    assert_eq!(body["email"], "ada@example.com");

    let code = harness.email_outbox.last_code().await;
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify/confirm")
            .set_json(serde_json::json!({
                "channel": "email",
                "email": "ada@example.com",
                "code": code
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["verified"], true);
    assert!(body["access_token"].as_str().unwrap().contains('.'));
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();
    let access_token = body["access_token"].as_str().unwrap().to_string();

    // Login now succeeds.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(serde_json::json!({
                "email": "ada@example.com",
                "password": "s3cret-password"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    // Rotate the first session's refresh token, then log out.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(serde_json::json!({ "refresh_token": refresh_token }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let rotated = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh_token);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", access_token)))
            .set_json(serde_json::json!({ "refresh_token": rotated }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn verify_start_does_not_reveal_unknown_accounts() {
    let harness = harness();
    let app = test_app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify/start")
            .set_json(serde_json::json!({
                "channel": "email",
                "email": "nobody@example.com"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body.get("destination").is_none());
}

#[actix_web::test]
async fn wrong_code_answers_400() {
    let harness = harness();
    let app = test_app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(register_body("ada@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify/confirm")
            .set_json(serde_json::json!({
                "channel": "email",
                "email": "ada@example.com",
                "code": "000000"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_code");
}

#[actix_web::test]
async fn verify_start_requires_the_channels_field() {
    let harness = harness();
    let app = test_app!(harness);

    // Phone channel with only an email present.
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/verify/start")
            .set_json(serde_json::json!({
                "channel": "phone",
                "email": "ada@example.com"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn invalid_register_payload_answers_400() {
    let harness = harness();
    let app = test_app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(serde_json::json!({
                "email": "not-an-email",
                "password": "short",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "role": "tenant"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn logout_without_bearer_token_answers_401() {
    let harness = harness();
    let app = test_app!(harness);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .set_json(serde_json::json!({ "refresh_token": "whatever" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 401);
}
