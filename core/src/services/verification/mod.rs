//! Verification engine: one-time numeric codes proving control of an email
//! address or phone number.
//!
//! The engine covers the full code lifecycle:
//! - uniform random code generation and one-way hashing
//! - delivery through pluggable channel senders (failures are swallowed)
//! - race-safe confirmation with bounded, persisted attempt counting
//! - destination masking for API responses

mod config;
mod masking;
mod service;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use config::VerificationConfig;
pub use masking::{mask_destination, normalize_destination};
pub use service::VerificationService;
pub use traits::ChannelSender;
