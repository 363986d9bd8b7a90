//! User repository interface and mock implementation

pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;

pub mod mock;

pub use mock::MockUserRepository;
pub use r#trait::UserRepository;
