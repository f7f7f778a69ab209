//! Error types for the search gateway.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Decode and upstream failures collapse to a generic `400 Bad request` at the
//! HTTP boundary, and a missing callback template is a `500`. The detail only
//! goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors from the upstream client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error (includes exhausted retries)
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Upstream rejected the request (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from upstream
        message: String,
    },

    /// Upstream resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Form-urlencoded parsing error
    #[error("Failed to parse form response: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    /// The OAuth provider answered with an error instead of a token.
    #[error("OAuth provider error: {error}")]
    OAuth {
        /// Provider error code (e.g. `bad_verification_code`)
        error: String,
        /// Optional human-readable description
        description: Option<String>,
    },

    /// The document service refused a batch.
    #[error("Document batch rejected: {0}")]
    Rejected(String),

    /// Required client configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create an OAuth provider error.
    #[must_use]
    pub fn oauth(error: impl Into<String>, description: Option<String>) -> Self {
        Self::OAuth { error: error.into(), description }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Upstream HTTP status, if the failure carried one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } | Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by request handlers.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// The request body could not be read or decoded.
    #[error("Invalid request body: {0}")]
    Decode(String),

    /// The upstream call failed.
    #[error("Upstream error: {0}")]
    Upstream(#[from] ClientError),

    /// The callback template could not be loaded.
    #[error("Template error: {0}")]
    Template(#[from] std::io::Error),
}

impl GatewayError {
    /// Create a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) | Self::Upstream(_) => StatusCode::BAD_REQUEST,
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Decode(message) => tracing::warn!(error = %message, "Rejected request body"),
            Self::Upstream(e) => tracing::error!(error = %e, "Upstream call failed"),
            Self::Template(e) => tracing::error!(error = %e, "Failed to load template"),
        }

        let status = self.status_code();
        let body = if status == StatusCode::BAD_REQUEST {
            "Bad request"
        } else {
            "Internal server error"
        };
        (status, body).into_response()
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for handler operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_status() {
        assert_eq!(ClientError::bad_request("nope").status(), Some(400));
        assert_eq!(ClientError::not_found("/search").status(), Some(404));
        assert_eq!(ClientError::server(503, "down").status(), Some(503));
        assert_eq!(ClientError::oauth("bad_verification_code", None).status(), None);
    }

    #[test]
    fn test_gateway_error_collapses_to_bad_request() {
        assert_eq!(GatewayError::decode("EOF").status_code(), StatusCode::BAD_REQUEST);
        let upstream = GatewayError::from(ClientError::server(500, "boom"));
        assert_eq!(upstream.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_template_error_is_internal() {
        let err = GatewayError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_oauth_error_message() {
        let err = ClientError::oauth("bad_verification_code", Some("expired".to_string()));
        assert!(err.to_string().contains("bad_verification_code"));
    }
}
