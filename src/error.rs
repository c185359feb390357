//! Error types for postrelay.
//!
//! [`RelayError`] covers process-level failures (binding, CLI health
//! checks, upstream URL validation) and is reported once by `main`.
//! [`ForwardError`] is the per-request taxonomy produced by the
//! forwarder; it renders itself as a JSON `{"error": ...}` body with the
//! matching status code so no failure escapes the request boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Invalid upstream URL: {0}")]
    InvalidUpstream(String),

    #[error("Upstream URL not set.\n\n  {hint}")]
    UpstreamNotSet { hint: String },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

/// Outcome of a single forwarding attempt that did not yield an upstream
/// response to pass through.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ForwardError {
    #[error("Configuration error: Main API URL not set.")]
    Configuration,

    #[error("No JSON data received.")]
    BadRequest,

    #[error("Failed to forward request: {0}")]
    Upstream(String),

    #[error("An unexpected error occurred: {0}")]
    Internal(String),
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Configuration | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
