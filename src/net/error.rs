//! Normalized failure envelope for every API call.
//!
//! DESIGN
//! ======
//! Failures arrive in three raw shapes: a response whose body the backend
//! filled in, a response with nothing usable in it, and no response at all.
//! [`normalize_failure`] collapses them into [`ApiError`] in that priority
//! order. Structured backend bodies are kept verbatim so views can read
//! whatever fields the backend chose to send.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::{Map, Value};

use super::transport::{RawResponse, TransportError};
use super::types::is_truthy;

pub const DEFAULT_NETWORK_ERROR: &str = "Network error";
const DEFAULT_BACKEND_ERROR: &str = "Request failed";

/// Error returned by every [`ApiClient`](super::api::ApiClient) operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a structured body. Surfaced unaltered.
    #[error("{}", backend_message(.0))]
    Backend(Value),
    /// The backend answered but the body was empty or unusable.
    #[error("request failed with status {status}")]
    Response { status: u16, status_text: String },
    /// No response at all.
    #[error("{message}")]
    Network { message: String },
}

impl ApiError {
    /// Human-readable message for display.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Backend(body) => backend_message(body).to_owned(),
            Self::Response { status, status_text } if status_text.is_empty() => {
                format!("request failed with status {status}")
            }
            Self::Response { status, status_text } => format!("{status} {status_text}"),
            Self::Network { message } => message.clone(),
        }
    }

    /// HTTP status, when a response was received and the body did not hide it.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Backend(_) | Self::Network { .. } => None,
        }
    }

    /// Flatten into the `{message, ...}` envelope shape.
    ///
    /// Backend objects keep all their fields; a `message` key is added only
    /// when the backend did not send one.
    #[must_use]
    pub fn to_envelope(&self) -> Value {
        match self {
            Self::Backend(Value::Object(fields)) => {
                let mut fields = fields.clone();
                if !fields.contains_key("message") {
                    fields.insert("message".to_owned(), Value::String(self.message()));
                }
                Value::Object(fields)
            }
            Self::Backend(other) => {
                let mut fields = Map::new();
                fields.insert("message".to_owned(), Value::String(self.message()));
                fields.insert("body".to_owned(), other.clone());
                Value::Object(fields)
            }
            Self::Response { status, status_text } => serde_json::json!({
                "message": self.message(),
                "status": status,
                "statusText": status_text,
            }),
            Self::Network { message } => serde_json::json!({ "message": message }),
        }
    }
}

/// A failed exchange before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawFailure {
    /// Non-2xx response.
    Response(RawResponse),
    /// No response.
    Transport(TransportError),
}

/// Collapse a raw failure into an [`ApiError`].
///
/// Body first, then the bare response, then a message-only envelope.
#[must_use]
pub fn normalize_failure(failure: RawFailure) -> ApiError {
    match failure {
        RawFailure::Response(resp) => {
            let body = parse_body(&resp.body);
            // Falsy bodies (`null`, `false`, `0`, `""`) carry nothing worth surfacing.
            if is_truthy(&body) {
                ApiError::Backend(body)
            } else {
                ApiError::Response { status: resp.status, status_text: resp.status_text }
            }
        }
        RawFailure::Transport(err) => ApiError::Network {
            message: match err.message() {
                Some(_) => err.to_string(),
                None => DEFAULT_NETWORK_ERROR.to_owned(),
            },
        },
    }
}

/// Decode a response body: JSON when it parses, raw text otherwise,
/// `Null` when empty.
#[must_use]
pub fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn backend_message(body: &Value) -> &str {
    match body {
        Value::String(text) => text,
        Value::Object(fields) => ["message", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .unwrap_or(DEFAULT_BACKEND_ERROR),
        _ => DEFAULT_BACKEND_ERROR,
    }
}
