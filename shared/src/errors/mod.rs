//! Error body shape returned by the marketplace API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error body as rendered by the backend
///
/// Authentication failures carry `detail` and `code`; validation failures
/// are keyed by field name (`{"email": ["This field is required."]}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Top-level message, when the backend sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Machine-readable error code, when the backend sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Per-field validation messages and any other keys
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,

    /// When the client received the error
    #[serde(skip, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create an error response with just a message
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            code: None,
            fields: BTreeMap::new(),
            received_at: Utc::now(),
        }
    }

    /// Attach an error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Parse a raw response body; `None` when it is not a JSON object
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body).ok()
    }

    /// Human-readable summary: the detail, or the first field message
    pub fn message(&self) -> String {
        if let Some(detail) = &self.detail {
            return detail.clone();
        }
        self.fields
            .iter()
            .find_map(|(field, value)| {
                let text = match value {
                    serde_json::Value::Array(items) => items.first()?.as_str()?.to_string(),
                    serde_json::Value::String(s) => s.clone(),
                    _ => return None,
                };
                Some(if field == "non_field_errors" {
                    text
                } else {
                    format!("{}: {}", field, text)
                })
            })
            .unwrap_or_else(|| String::from("Unknown error"))
    }

    /// Whether the backend flagged the access credential itself as invalid
    pub fn is_token_invalid(&self) -> bool {
        self.code.as_deref() == Some(error_codes::TOKEN_NOT_VALID)
    }
}

/// Error codes the backend is known to emit
pub mod error_codes {
    pub const TOKEN_NOT_VALID: &str = "token_not_valid";
    pub const NOT_AUTHENTICATED: &str = "not_authenticated";
    pub const AUTHENTICATION_FAILED: &str = "authentication_failed";
    pub const PERMISSION_DENIED: &str = "permission_denied";
}
