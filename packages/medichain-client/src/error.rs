//! Error types for the MediChain client.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type for MediChain client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// MediChain client errors.
///
/// Callers can always tell "the server answered with an error" apart from
/// "the server was never reached": the former is [`ApiError::Http`] and
/// displays the resolved backend message, the latter is [`ApiError::Network`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server (DNS failure, connection refused)
    #[error("Network error: Failed to connect to the server. Please check your internet connection and ensure the backend server is running.")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-2xx status; `message` is already
    /// resolved into human-readable form
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    /// A 2xx body could not be decoded into the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Status code of an HTTP error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server answered 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Resolve a non-2xx response body into a display-ready message.
///
/// Precedence: a `detail` field, then a `message` field, then the body
/// itself when it is a JSON string, then the whole body when it is a
/// non-empty object or array. Anything else (empty object, bare number,
/// invalid JSON) falls back to `HTTP error! status: {code}`.
pub(crate) fn resolve_error_message(status: StatusCode, body: &str) -> String {
    let fallback = format!("HTTP error! status: {}", status.as_u16());

    let Ok(data) = serde_json::from_str::<Value>(body) else {
        return fallback;
    };

    match data {
        Value::Object(ref fields) => {
            if let Some(detail) = fields.get("detail") {
                field_to_message(detail)
            } else if let Some(message) = fields.get("message") {
                field_to_message(message)
            } else if !fields.is_empty() {
                data.to_string()
            } else {
                fallback
            }
        }
        Value::String(text) => text,
        Value::Array(ref items) if !items.is_empty() => data.to_string(),
        _ => fallback,
    }
}

/// Strings pass through untouched; anything else is serialized back to JSON
/// (the backend nests validation maps under `detail`).
fn field_to_message(field: &Value) -> String {
    match field {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
