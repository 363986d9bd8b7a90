//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable message
    pub detail: String,

    /// Additional error details if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a single detail to the error body
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        details.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_without_empty_details() {
        let body = ErrorBody::new("invalid_code", "Invalid code.");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "invalid_code");
        assert_eq!(json["detail"], "Invalid code.");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn error_body_with_detail() {
        let body = ErrorBody::new("validation_error", "Invalid request data")
            .with_detail("field", serde_json::json!("email"));
        assert_eq!(body.details.unwrap()["field"], "email");
    }
}
