//! Repository interfaces for data persistence
//!
//! Each repository module contains the async trait consumed by the services
//! and an in-memory mock used by tests.

pub mod token;
pub mod user;
pub mod verification_code;

pub use token::{MockTokenRepository, TokenRepository};
pub use user::{MockUserRepository, UserRepository};
pub use verification_code::{MockVerificationCodeRepository, VerificationCodeRepository};
