//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Build one shared `reqwest::Client` from config
//! - Issue a GET for the destination URL and buffer the full body
//!
//! # Design Decisions
//! - Only the URL is forwarded; inbound method, body and headers are not
//! - The body is read completely before the response is relayed
//! - Dropping the returned future aborts the fetch

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
};
use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Non-canonical reason phrase sent by the upstream, if any.
    pub reason: Option<ReasonPhrase>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Shared client used for all destination fetches.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    /// Build the client from upstream and timeout settings.
    pub fn new(config: &UpstreamConfig, timeouts: &TimeoutConfig) -> reqwest::Result<Self> {
        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .redirect(redirect);

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Fetch `url` and wait for the complete body.
    pub async fn fetch(&self, url: &Url) -> reqwest::Result<UpstreamResponse> {
        let response = self.inner.get(url.clone()).send().await?;

        let status = response.status();
        let reason = response.extensions().get::<ReasonPhrase>().cloned();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::trace!(url = %url, status = %status, bytes = body.len(), "Upstream body buffered");

        Ok(UpstreamResponse {
            status,
            reason,
            headers,
            body,
        })
    }
}
