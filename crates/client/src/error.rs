use serde_json::Value;
use thiserror::Error;

/// Normalized failure of a request made through [`crate::ApiClient`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was received (connection refused, timeout, DNS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        /// Server-provided message taken from the `error` field of the body.
        message: Option<String>,
        body: Option<Value>,
    },

    /// The server answered with a success status but the body did not decode.
    #[error("failed to decode response ({status}): {reason}")]
    Decode { status: u16, reason: String },

    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// HTTP status of the response, absent when nothing came back.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Display message: the server's own message when present, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub(crate) fn from_error_body(status: u16, raw: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(raw).ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        ApiError::Api {
            status,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_field() {
        let err = ApiError::from_error_body(401, br#"{"error": "Invalid credentials"}"#);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(err.message_or("fallback"), "Invalid credentials");
    }

    #[test]
    fn falls_back_without_error_field() {
        let err = ApiError::from_error_body(400, br#"{"message": "ignored"}"#);
        assert_eq!(err.server_message(), None);
        assert_eq!(err.message_or("fallback"), "fallback");

        let err = ApiError::from_error_body(502, b"<html>Bad gateway</html>");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message_or("fallback"), "fallback");
    }

    #[test]
    fn network_errors_have_no_status() {
        let err = ApiError::Network("connection refused".into());
        assert!(err.is_network());
        assert_eq!(err.status(), None);
        assert_eq!(err.message_or("fallback"), "fallback");
    }
}
