//! Authentication endpoints under /api/v1/auth

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod verify_confirm;
pub mod verify_start;

pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use register::register;
pub use verify_confirm::verify_confirm;
pub use verify_start::verify_start;
