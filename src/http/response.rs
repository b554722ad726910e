//! Response handling and transformation.
//!
//! # Responsibilities
//! - Copy the upstream header set into a fresh, mutable map
//! - Inject CORS headers derived from the inbound request
//! - Rebuild the client response from status, reason phrase, headers and buffered body
//!
//! # Design Decisions
//! - Upstream headers are never mutated in place; a copy is rewritten
//! - Hop-by-hop headers and `content-length` are dropped because the body is re-framed
//! - Repeated upstream headers keep all their values

use axum::{
    body::Body,
    http::{
        header::{self, HeaderName},
        HeaderMap, HeaderValue, Method,
    },
    response::Response,
};

use crate::upstream::UpstreamResponse;

/// Non-standard inbound header requesting an `Access-Control-Max-Age` value.
pub const MAX_AGE_OVERRIDE: &str = "access-control-max-age-override";

/// Inbound header mirrored into `Access-Control-Allow-Methods`.
pub const REQUEST_METHODS: &str = "access-control-request-methods";

const HOP_BY_HOP: [HeaderName; 5] = [
    header::CONNECTION,
    header::TRANSFER_ENCODING,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name)
        || *name == header::CONTENT_LENGTH
        || name.as_str() == "keep-alive"
        || name.as_str() == "proxy-connection"
}

/// Clone `headers` into a new map, skipping hop-by-hop entries.
pub fn clone_headers(headers: &HeaderMap) -> HeaderMap {
    let mut cloned = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            cloned.append(name.clone(), value.clone());
        }
    }
    cloned
}

/// Apply the CORS policy to `headers` for a request with `method` and `inbound` headers.
pub fn apply_cors(method: &Method, inbound: &HeaderMap, headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    if *method == Method::OPTIONS {
        if let Some(max_age) = inbound.get(MAX_AGE_OVERRIDE) {
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, max_age.clone());
        }
    }

    if let Some(methods) = inbound.get(REQUEST_METHODS) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, methods.clone());
    }

    if let Some(requested) = inbound.get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }

    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("*"),
    );
}

/// Build the client response for a buffered upstream response.
pub fn rewrite(upstream: UpstreamResponse, method: &Method, inbound: &HeaderMap) -> Response {
    let mut headers = clone_headers(&upstream.headers);
    apply_cors(method, inbound, &mut headers);

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    if let Some(reason) = upstream.reason {
        response.extensions_mut().insert(reason);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Bytes, http::StatusCode};
    use hyper::ext::ReasonPhrase;

    fn inbound(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (k, v) in pairs {
            headers.append(*k, HeaderValue::from_static(*v));
        }
        headers
    }

    fn upstream() -> UpstreamResponse {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::SET_COOKIE, HeaderValue::from_static("b=2"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("5"));
        UpstreamResponse {
            status: StatusCode::IM_A_TEAPOT,
            reason: None,
            headers,
            body: Bytes::from_static(b"hello"),
        }
    }

    #[test]
    fn test_clone_keeps_repeated_and_drops_hop_by_hop() {
        let cloned = clone_headers(&upstream().headers);
        assert_eq!(cloned.get_all(header::SET_COOKIE).iter().count(), 2);
        assert_eq!(cloned[header::CONTENT_TYPE], "text/plain");
        assert!(cloned.get(header::CONNECTION).is_none());
        assert!(cloned.get(header::CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_always_sets_allow_origin_and_expose() {
        let mut headers = HeaderMap::new();
        apply_cors(&Method::GET, &HeaderMap::new(), &mut headers);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_EXPOSE_HEADERS], "*");
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_none());
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).is_none());
        assert!(headers.get(header::ACCESS_CONTROL_MAX_AGE).is_none());
    }

    #[test]
    fn test_overrides_upstream_allow_origin() {
        let mut headers = inbound(&[("access-control-allow-origin", "https://only.test")]);
        apply_cors(&Method::GET, &HeaderMap::new(), &mut headers);
        assert_eq!(
            headers.get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(),
            1
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_mirrors_requested_methods_and_headers() {
        let req = inbound(&[
            ("access-control-request-methods", "GET, POST"),
            ("access-control-request-headers", "x-custom"),
        ]);
        let mut headers = HeaderMap::new();
        apply_cors(&Method::GET, &req, &mut headers);

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
    }

    #[test]
    fn test_max_age_override_only_on_options() {
        let req = inbound(&[("access-control-max-age-override", "600")]);

        let mut headers = HeaderMap::new();
        apply_cors(&Method::GET, &req, &mut headers);
        assert!(headers.get(header::ACCESS_CONTROL_MAX_AGE).is_none());

        let mut headers = HeaderMap::new();
        apply_cors(&Method::OPTIONS, &req, &mut headers);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "600");
    }

    #[test]
    fn test_rewrite_keeps_status_and_body() {
        let response = rewrite(upstream(), &Method::GET, &HeaderMap::new());
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_rewrite_carries_custom_reason_phrase() {
        let mut custom = upstream();
        custom.status = StatusCode::OK;
        custom.reason = Some(ReasonPhrase::from_static(b"Totally Fine"));

        let response = rewrite(custom, &Method::GET, &HeaderMap::new());
        let reason = response.extensions().get::<ReasonPhrase>().unwrap();
        assert_eq!(reason.as_bytes(), b"Totally Fine");

        let response = rewrite(upstream(), &Method::GET, &HeaderMap::new());
        assert!(response.extensions().get::<ReasonPhrase>().is_none());
    }
}
