//! Token issuer: signed JWT access tokens plus opaque, server-tracked
//! refresh tokens.

mod config;
mod service;

pub use config::TokenServiceConfig;
pub use service::TokenService;
