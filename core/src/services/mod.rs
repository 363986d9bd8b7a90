//! Business logic services
//!
//! Services are generic over the repository and sender traits so tests can
//! run them against the in-memory mocks.

pub mod auth;
pub mod token;
pub mod verification;

pub use auth::AuthService;
pub use token::TokenService;
pub use verification::VerificationService;
