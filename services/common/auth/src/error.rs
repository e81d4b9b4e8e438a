use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

pub type GateResult<T> = Result<T, GateError>;

/// Per-request rejection produced by the gate. Every variant renders as the same
/// `401 {"error": ...}` response and only the message differs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    MalformedHeader,
    #[error("Invalid Authorization header format")]
    ShapeMismatch,
    #[error("Invalid JSON Web Token : {0}")]
    DecodeFailure(String),
}

impl GateError {
    pub const STATUS: StatusCode = StatusCode::UNAUTHORIZED;

    /// Serialized response body, exactly as it goes on the wire.
    pub fn body(&self) -> String {
        json!({ "error": self.to_string() }).to_string()
    }
}

impl From<DecodeError> for GateError {
    fn from(value: DecodeError) -> Self {
        Self::DecodeFailure(value.message)
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let body = self.body();
        let length = HeaderValue::from(body.len());

        (
            Self::STATUS,
            [
                (CONTENT_TYPE, HeaderValue::from_static("application/json")),
                (CONTENT_LENGTH, length),
            ],
            body,
        )
            .into_response()
    }
}

/// Failure reported by a [`TokenCodec`](crate::codec::TokenCodec). The message is embedded
/// verbatim in the rejection body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("gate configuration requires a secret")]
    MissingSecret,
}
