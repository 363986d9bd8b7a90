//! # Infrastructure Layer
//!
//! Concrete implementations of the core's repository and channel sender
//! traits: MySQL persistence via SQLx, SMTP email delivery via lettre, and
//! SMS delivery (Twilio, or a console mock for development).
//!
//! ## Features
//!
//! - `mysql`: MySQL database support (default)
//! - `twilio-sms`: Twilio SMS sender

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email delivery - SMTP sender
pub mod email;

/// SMS delivery - external providers and the development mock
pub mod sms;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (missing or malformed environment values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email delivery error
    #[error("Email error: {0}")]
    Email(String),

    /// SMS delivery error
    #[error("SMS error: {0}")]
    Sms(String),
}
