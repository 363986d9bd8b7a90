//! Auth gateway: registration, login gating, verification orchestration and
//! refresh-token rotation.

mod password;
mod service;

#[cfg(test)]
mod tests;

pub use password::{hash_password, verify_password};
pub use service::{AuthService, RegisterData, RegistrationOutcome};
