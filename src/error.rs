//! Request-level error types.
//!
//! Every variant is terminal for the request that raised it.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that end a proxied request before a successful relay.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Destination does not parse as an absolute URL.
    #[error("Invalid destination URL: {0}")]
    InvalidDestination(String),

    /// Destination hostname rejected by the allow/block lists.
    #[error("Blocked destination hostname: {0}")]
    BlockedDestination(String),

    /// Origin is required but neither header was sent.
    #[error("Missing required Origin/X-Requested-With header")]
    MissingOrigin,

    /// Origin value does not parse as an absolute URL.
    #[error("Invalid Origin/X-Requested-With URL: {0}")]
    InvalidOrigin(String),

    /// Origin hostname rejected by the allow/block lists.
    #[error("Blocked origin hostname: {0}")]
    BlockedOrigin(String),

    /// The upstream fetch failed (connect, DNS, timeout, body read).
    #[error("Upstream request failed: {url}")]
    Upstream {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ProxyError {
    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidDestination(_) | Self::MissingOrigin | Self::InvalidOrigin(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BlockedDestination(_) | Self::BlockedOrigin(_) => StatusCode::FORBIDDEN,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::InvalidDestination(_) | Self::InvalidOrigin(_) => "malformed_input",
            Self::BlockedDestination(_) | Self::BlockedOrigin(_) => "policy_rejection",
            Self::MissingOrigin => "missing_header",
            Self::Upstream { .. } => "upstream_failure",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), self.to_string()).into_response();
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}
