//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error code from server, `unknown` when none was sent.
        code: String,
        /// Decoded error message.
        message: String,
    },

    /// Session missing or expired.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Request refused, typically a missing or stale anti-forgery token.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Forbidden(_))
            || matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if the backend rejected the request content (HTTP 400).
    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::Api { status: 400, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }

    /// Build the error for a non-2xx response body.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let decoded = ErrorBody::decode(body);
        let message = decoded
            .message
            .unwrap_or_else(|| status_text(status));

        match status.as_u16() {
            401 => Error::Auth(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            code => Error::Api {
                status: code,
                code: decoded.code.unwrap_or_else(|| "unknown".to_string()),
                message,
            },
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Best-effort view of an error body.
///
/// The backend answers with `{"error": ...}`, `{"message": ...}`,
/// `{"detail": ...}`, or a field-to-messages map for validation failures.
#[derive(Debug, Default)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl ErrorBody {
    fn decode(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return Self::default();
        };
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let code = object
            .get("code")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let message = ["message", "error", "detail"]
            .iter()
            .find_map(|key| object.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .or_else(|| field_errors(object));

        Self { code, message }
    }
}

/// Flatten `{"field": ["msg", ...]}` into `field: msg; ...`.
fn field_errors(object: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    let parts: Vec<String> = object
        .iter()
        .filter_map(|(field, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                _ => return None,
            };
            (!text.is_empty()).then(|| format!("{field}: {text}"))
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join("; "))
}
