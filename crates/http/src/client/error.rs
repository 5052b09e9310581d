//! Client error types

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Body of a non-2xx response
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    /// Raw response text, or the status line when the body was empty
    pub message: String,
    /// Parsed JSON payload, if the body was JSON
    pub data: Option<Value>,
}

impl ErrorBody {
    /// Build from a response body
    pub fn from_text(text: String, fallback: &str) -> Self {
        let data = serde_json::from_str(&text).ok();
        let message = if text.trim().is_empty() {
            fallback.to_string()
        } else {
            text
        };
        Self { message, data }
    }

    /// The `error` field of a structured payload such as `{"error": "..."}`
    pub fn error_message(&self) -> Option<&str> {
        self.data.as_ref()?.get("error")?.as_str()
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: ErrorBody },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(ErrorBody),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(ErrorBody),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(ErrorBody),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(ErrorBody),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A header could not be encoded
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, body: ErrorBody) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(body),
            401 => Self::AuthenticationFailed(body),
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            _ => Self::ServerError {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// HTTP status of the failed response, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            Self::Request(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Response body of the failed request, if any
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::BadRequest(body)
            | Self::AuthenticationFailed(body)
            | Self::Forbidden(body)
            | Self::NotFound(body)
            | Self::ServerError { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Server-supplied error message from a `{"error": "..."}` payload
    pub fn server_message(&self) -> Option<&str> {
        self.body().and_then(ErrorBody::error_message)
    }

    /// Whether the server rejected the credential
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}
