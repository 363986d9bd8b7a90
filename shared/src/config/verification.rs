//! Verification code policy configuration

use serde::{Deserialize, Serialize};

/// Policy for one-time verification codes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of digits in a verification code (clamped to 4..=10)
    pub code_length: u32,

    /// Minutes until a code expires
    pub ttl_minutes: i64,

    /// Maximum confirmation attempts per code
    pub max_attempts: i32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_minutes: 10,
            max_attempts: 5,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_length: std::env::var("VERIFICATION_CODE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.code_length),
            ttl_minutes: std::env::var("VERIFICATION_CODE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_minutes),
            max_attempts: std::env::var("VERIFICATION_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_attempts),
        }
    }
}
