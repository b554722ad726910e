//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the relay handler
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Build the shared upstream client
//! - Serve until the shutdown signal fires

use axum::{http::StatusCode, routing::any, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::handler::proxy_handler;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::security::AccessPolicy;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub access: Arc<AccessPolicy>,
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Build handler state from a validated configuration.
    pub fn from_config(config: &ProxyConfig) -> reqwest::Result<Self> {
        Ok(Self {
            access: Arc::new(AccessPolicy::from(&config.access)),
            upstream: UpstreamClient::new(&config.upstream, &config.timeouts)?,
        })
    }
}

/// HTTP server for the CORS relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> reqwest::Result<Self> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// A clone of the configured router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
