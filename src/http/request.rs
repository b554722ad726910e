//! Request inspection helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Read the caller's origin from `Origin` / `X-Requested-With`
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An existing `x-request-id` from the caller is kept

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Legacy header used as an origin fallback.
pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

/// Produces a fresh UUID v4 for every request lacking an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID for logging, or `"unknown"` if none was assigned.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The caller-declared origin, preferring `Origin` over `X-Requested-With`.
///
/// Empty or non-UTF-8 values count as absent.
pub fn origin_value(headers: &HeaderMap) -> Option<&str> {
    [header::ORIGIN, X_REQUESTED_WITH]
        .iter()
        .filter_map(|name| headers.get(name))
        .filter_map(|v| v.to_str().ok())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_prefers_origin_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://app.test"));
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("https://legacy.test"));
        assert_eq!(origin_value(&headers), Some("https://app.test"));
    }

    #[test]
    fn test_origin_falls_back_to_requested_with() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REQUESTED_WITH, HeaderValue::from_static("XMLHttpRequest"));
        assert_eq!(origin_value(&headers), Some("XMLHttpRequest"));

        headers.insert(header::ORIGIN, HeaderValue::from_static(""));
        assert_eq!(origin_value(&headers), Some("XMLHttpRequest"));
    }

    #[test]
    fn test_origin_absent() {
        assert_eq!(origin_value(&HeaderMap::new()), None);
    }

    #[test]
    fn test_make_request_id() {
        let request = Request::builder().body(()).unwrap();
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn test_request_id_fallback() {
        assert_eq!(request_id(&HeaderMap::new()), "unknown");
    }
}
