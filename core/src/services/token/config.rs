//! Token issuer configuration

/// Configuration for the token issuer
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Symmetric signing secret for HS256
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub access_token_minutes: i64,
    /// Refresh token lifetime in hours
    pub refresh_token_hours: i64,
    /// `iss` claim stamped into access tokens
    pub issuer: String,
    /// `aud` claim stamped into access tokens
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            access_token_minutes: 60,
            refresh_token_hours: 24,
            issuer: "rently".to_string(),
            audience: "rently-api".to_string(),
        }
    }
}
