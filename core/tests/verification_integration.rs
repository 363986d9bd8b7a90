//! End-to-end verification flows over the public core API, backed by the
//! in-memory repositories.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use rently_core::domain::entities::user::UserRole;
use rently_core::domain::entities::verification_code::Channel;
use rently_core::errors::{AuthError, DomainError};
use rently_core::repositories::token::MockTokenRepository;
use rently_core::repositories::user::MockUserRepository;
use rently_core::repositories::verification_code::MockVerificationCodeRepository;
use rently_core::services::auth::{AuthService, RegisterData};
use rently_core::services::token::{TokenService, TokenServiceConfig};
use rently_core::services::verification::{
    ChannelSender, VerificationConfig, VerificationService,
};

/// Captures outbound messages so tests can read the code that was "sent"
#[derive(Clone, Default)]
struct Outbox {
    messages: Arc<RwLock<Vec<String>>>,
}

impl Outbox {
    async fn last_code(&self) -> String {
        let body = self.messages.read().await.last().cloned().unwrap();
        // The code is the longest digit run; bodies also mention the expiry.
        let mut best = String::new();
        let mut current = String::new();
        for c in body.chars() {
            if c.is_ascii_digit() {
                current.push(c);
            } else {
                if current.len() > best.len() {
                    best = current.clone();
                }
                current.clear();
            }
        }
        if current.len() > best.len() {
            best = current;
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

struct Stack {
    auth: AuthService<
        MockUserRepository,
        MockVerificationCodeRepository,
        Outbox,
        Outbox,
        MockTokenRepository,
    >,
    verification: Arc<
        VerificationService<MockUserRepository, MockVerificationCodeRepository, Outbox, Outbox>,
    >,
    outbox: Arc<Outbox>,
}

fn stack() -> Stack {
    let users = Arc::new(MockUserRepository::new());
    let codes = Arc::new(MockVerificationCodeRepository::with_users(users.clone()));
    let outbox = Arc::new(Outbox::default());
    let verification = Arc::new(VerificationService::new(
        users.clone(),
        codes,
        outbox.clone(),
        outbox.clone(),
        VerificationConfig::default(),
    ));
    let tokens = Arc::new(TokenService::new(
        Arc::new(MockTokenRepository::new()),
        TokenServiceConfig {
            jwt_secret: "integration-secret".to_string(),
            ..Default::default()
        },
    ));
    let auth = AuthService::new(users, verification.clone(), tokens);
    Stack {
        auth,
        verification,
        outbox,
    }
}

fn tenant() -> RegisterData {
    RegisterData {
        email: "tenant@example.com".to_string(),
        password: "s3cret-password".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone_number: Some("+15550001111".to_string()),
        role: UserRole::Tenant,
        verify_via: None,
    }
}

#[tokio::test]
async fn full_lifecycle_register_verify_login_refresh_logout() {
    let stack = stack();

    // Registration sends a code but grants nothing.
    let outcome = stack.auth.register(tenant()).await.unwrap();
    assert!(!outcome.user.is_verified);

    // Login before verification is refused with the destinations on offer.
    let premature = stack
        .auth
        .login("tenant@example.com", "s3cret-password")
        .await;
    assert!(matches!(
        premature,
        Err(DomainError::Auth(AuthError::VerificationRequired { .. }))
    ));

    // Confirming the emailed code verifies the account and opens a session.
    let code = stack.outbox.last_code().await;
    let session = stack
        .auth
        .confirm_verification(Channel::Email, "tenant@example.com", &code)
        .await
        .unwrap();
    assert!(session.user.is_verified);
    assert!(session.user.email_verified_at.is_some());

    // The code is single-use.
    let replay = stack
        .auth
        .confirm_verification(Channel::Email, "tenant@example.com", &code)
        .await;
    assert!(matches!(
        replay,
        Err(DomainError::Auth(AuthError::InvalidCode))
    ));

    // Refresh rotates, logout revokes.
    let refreshed = stack.auth.refresh_token(&session.refresh_token).await.unwrap();
    stack.auth.logout(&refreshed.refresh_token).await;
    assert!(stack.auth.refresh_token(&refreshed.refresh_token).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_confirmations_grant_exactly_one_session() {
    let stack = stack();
    stack.auth.register(tenant()).await.unwrap();
    let code = stack.outbox.last_code().await;

    let verification_a = stack.verification.clone();
    let verification_b = stack.verification.clone();
    let code_a = code.clone();
    let (left, right) = tokio::join!(
        async move {
            verification_a
                .confirm_code(Channel::Email, "tenant@example.com", &code_a)
                .await
        },
        async move {
            verification_b
                .confirm_code(Channel::Email, "tenant@example.com", &code)
                .await
        }
    );

    assert_eq!([&left, &right].iter().filter(|r| r.is_ok()).count(), 1);
}

#[tokio::test]
async fn too_many_wrong_guesses_lock_the_code_out() {
    let stack = stack();
    stack.auth.register(tenant()).await.unwrap();
    let code = stack.outbox.last_code().await;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    for _ in 0..5 {
        let result = stack
            .auth
            .confirm_verification(Channel::Email, "tenant@example.com", wrong)
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::InvalidCode))
        ));
    }

    // Even the correct code is refused now.
    let result = stack
        .auth
        .confirm_verification(Channel::Email, "tenant@example.com", &code)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::TooManyAttempts))
    ));

    // A fresh code gets its own budget.
    stack
        .auth
        .start_verification(Channel::Email, "tenant@example.com")
        .await
        .unwrap()
        .expect("a new code should be issued");
    let fresh = stack.outbox.last_code().await;
    let session = stack
        .auth
        .confirm_verification(Channel::Email, "tenant@example.com", &fresh)
        .await
        .unwrap();
    assert!(session.user.is_verified);
}
