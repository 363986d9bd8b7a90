//! Verification engine configuration

/// Configuration for the verification engine
///
/// Passed explicitly at construction; the engine reads no globals.
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Number of digits in a generated code; values outside 4..=10 fall back to 6
    pub code_length: u32,
    /// Minutes until a freshly issued code expires
    pub ttl_minutes: i64,
    /// Confirmation attempts allowed against a single code
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
    /// Code length actually used for generation, normalized into 4..=10
    pub fn effective_code_length(&self) -> u32 {
        if (4..=10).contains(&self.code_length) {
            self.code_length
        } else {
            6
        }
    }
}
