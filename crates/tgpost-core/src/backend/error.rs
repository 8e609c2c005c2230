//! Normalized backend failures.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single request/response round trip against the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced an HTTP response (connection refused, DNS, reset).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.trim().is_empty() => detail.clone(),
        _ => format!("HTTP {status}"),
    }
}

impl BackendError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn status(status: u16, detail: Option<String>) -> Self {
        Self::Status { status, detail }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Server-provided `detail`, if the backend sent a usable one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Human-readable reason for the activity log.
    ///
    /// Prefers the backend's `detail` message and falls back to the
    /// operation-specific `fallback` text for every other failure.
    pub fn reason(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Extracts the `detail` field from an error response body.
///
/// The backend sends either `{"detail": "message"}` or, for request
/// validation failures, `{"detail": [{"msg": "..."}, ...]}`. Validation
/// messages are joined with `"; "`.
pub fn detail_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Value::String(text) => Some(text),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_prefers_detail() {
        let err = BackendError::status(429, Some("rate limited".to_string()));
        assert_eq!(err.reason("Failed to get response"), "rate limited");
    }

    #[test]
    fn test_reason_falls_back_without_detail() {
        let err = BackendError::status(500, None);
        assert_eq!(err.reason("Failed to get response"), "Failed to get response");
        assert_eq!(err.to_string(), "HTTP 500");

        let blank = BackendError::status(502, Some("  ".to_string()));
        assert_eq!(blank.reason("Collector run failed"), "Collector run failed");

        let transport = BackendError::transport("connection refused");
        assert_eq!(transport.reason("Analyzer run failed"), "Analyzer run failed");
    }

    #[test]
    fn test_detail_from_string_body() {
        let detail = detail_from_body(r#"{"detail": "targets cannot be empty"}"#);
        assert_eq!(detail.as_deref(), Some("targets cannot be empty"));
    }

    #[test]
    fn test_detail_from_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "job"], "msg": "unexpected value", "type": "literal_error"},
            {"loc": ["body", "limit"], "msg": "must be an integer", "type": "int_parsing"}
        ]}"#;
        assert_eq!(
            detail_from_body(body).as_deref(),
            Some("unexpected value; must be an integer")
        );
    }

    #[test]
    fn test_detail_missing_or_invalid() {
        assert_eq!(detail_from_body(r#"{"error": "nope"}"#), None);
        assert_eq!(detail_from_body(r#"{"detail": null}"#), None);
        assert_eq!(detail_from_body("Internal Server Error"), None);
    }
}
