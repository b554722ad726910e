//! Request handler.
//!
//! Runs the relay pipeline for one inbound request:
//! extract → require origin → validate destination → destination lists
//! → validate origin → origin lists → fetch → rewrite.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::error::ProxyError;
use crate::http::request::{origin_value, request_id};
use crate::http::response::rewrite;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{extract_destination, parse_absolute_url};

/// Body returned when no destination is present in the path.
pub const RUNNING_MESSAGE: &str = "cors-relay is up and running 👍";

/// Main relay handler.
pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let method_str = parts.method.to_string();

    match relay(&state, &parts.method, &parts.uri, &parts.headers).await {
        Ok(response) => {
            metrics::record_request(&method_str, response.status().as_u16(), "relayed", start_time);
            response
        }
        Err(err) => {
            let request_id = request_id(&parts.headers);
            match &err {
                ProxyError::Upstream { url, source } => {
                    tracing::error!(request_id = %request_id, url = %url, error = %source, "Upstream error");
                }
                other => {
                    tracing::warn!(request_id = %request_id, reason = %other, "Request rejected");
                }
            }
            metrics::record_request(&method_str, err.status().as_u16(), err.outcome(), start_time);
            err.into_response()
        }
    }
}

/// Apply validation and access rules, then fetch and rewrite.
pub async fn relay(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ProxyError> {
    let request_id = request_id(headers);
    let raw_destination = extract_destination(uri);

    if raw_destination.is_empty() {
        return Ok((StatusCode::OK, RUNNING_MESSAGE).into_response());
    }

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        destination = %raw_destination,
        "Relaying request"
    );

    let raw_origin = origin_value(headers);
    let policy = &state.access;

    if policy.require_origin && raw_origin.is_none() {
        return Err(ProxyError::MissingOrigin);
    }

    let destination = parse_absolute_url(&raw_destination)
        .map_err(|e| ProxyError::InvalidDestination(e.input))?;
    let destination_host = destination.host_str().unwrap_or_default();
    if !policy.destination.permits(destination_host) {
        return Err(ProxyError::BlockedDestination(destination_host.to_string()));
    }

    if let Some(raw_origin) = raw_origin {
        let origin =
            parse_absolute_url(raw_origin).map_err(|e| ProxyError::InvalidOrigin(e.input))?;
        let origin_host = origin.host_str().unwrap_or_default();
        if !policy.origin.permits(origin_host) {
            return Err(ProxyError::BlockedOrigin(origin_host.to_string()));
        }
    }

    let upstream = state
        .upstream
        .fetch(&destination)
        .await
        .map_err(|source| ProxyError::Upstream {
            url: destination.to_string(),
            source,
        })?;

    tracing::debug!(
        request_id = %request_id,
        status = %upstream.status,
        bytes = upstream.body.len(),
        "Upstream responded"
    );

    Ok(rewrite(upstream, method, headers))
}
