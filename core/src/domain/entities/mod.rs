//! Domain entities

pub mod token;
pub mod user;
pub mod verification_code;

pub use token::{Claims, RefreshToken, TokenPair};
pub use user::{User, UserRole};
pub use verification_code::{Channel, VerificationCode};
