//! Destination extraction and URL validation.
//!
//! # Responsibilities
//! - Derive the proxied URL from the inbound path and query
//! - Parse destination and origin values as absolute URLs
//!
//! # Design Decisions
//! - Only the first character of the path is stripped; nothing else is decoded
//! - A URL without a host (e.g. `mailto:`) is rejected like a parse failure

use axum::http::Uri;
use thiserror::Error;
use url::Url;

/// Raised when a value cannot be used as an absolute URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid URL: {input}")]
pub struct InvalidUrl {
    pub input: String,
}

/// Extract the raw destination string from an inbound request URI.
///
/// `/https://example.com/page?x=1` yields `https://example.com/page?x=1`.
/// An empty string means no destination was requested.
pub fn extract_destination(uri: &Uri) -> String {
    let mut raw = uri.path().to_string();
    if let Some(query) = uri.query().filter(|q| !q.is_empty()) {
        raw.push('?');
        raw.push_str(query);
    }

    let mut chars = raw.chars();
    chars.next();
    chars.as_str().to_string()
}

/// Parse `input` as an absolute URL with a scheme and a host.
pub fn parse_absolute_url(input: &str) -> Result<Url, InvalidUrl> {
    let invalid = || InvalidUrl {
        input: input.to_string(),
    };

    let url = Url::parse(input).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}
