//! API errors.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server could not be reached.
    #[error("could not reach the server")]
    Network(#[source] reqwest::Error),

    /// The request was rejected (4xx other than 401/403/404).
    #[error("{message}")]
    Validation { status: u16, message: String },

    /// Missing, expired or insufficient credentials.
    #[error("not authorized")]
    Unauthorized { message: Option<String> },

    #[error("not found")]
    NotFound { message: Option<String> },

    /// The server failed (5xx).
    #[error("server error ({status})")]
    Server { status: u16, message: Option<String> },

    /// The response body was not what the client expected.
    #[error("unexpected response from server")]
    Decode(#[source] serde_json::Error),

    /// The stored credentials could not be read.
    #[error("failed to read credentials")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "message", alias = "error")]
    msg: Option<String>,
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.msg)
            .filter(|msg| !msg.trim().is_empty());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized { message },
            StatusCode::NOT_FOUND => Self::NotFound { message },
            status if status.is_server_error() => Self::Server {
                status: status.as_u16(),
                message,
            },
            status => Self::Validation {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| format!("request rejected ({status})")),
            },
        }
    }

    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Validation { message, .. } => Some(message),
            Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::Server { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Decode(_) | Self::Storage(_) => None,
        }
    }

    /// Backend message, or `fallback` when the backend gave none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    /// Whether the caller should send the user back to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_backend_msg_field() {
        let error = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"msg": "Stok habis"}"#);

        assert!(matches!(
            &error,
            ApiError::Validation { status: 400, message } if message == "Stok habis"
        ));
        assert_eq!(error.to_string(), "Stok habis");
    }

    #[test]
    fn unauthorized_requires_login() {
        let error = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"msg": "Token has expired"}"#,
        );

        assert!(error.requires_login());
        assert_eq!(error.server_message(), Some("Token has expired"));
    }

    #[test]
    fn non_json_bodies_fall_back() {
        let error = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");

        assert!(matches!(error, ApiError::Server { status: 502, message: None }));
        assert_eq!(error.message_or("Something went wrong"), "Something went wrong");
    }

    #[test]
    fn not_found_is_distinct() {
        let error = ApiError::from_response(StatusCode::NOT_FOUND, "{}");

        assert!(matches!(error, ApiError::NotFound { message: None }));
    }
}
