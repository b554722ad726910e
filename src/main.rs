//! CORS relay (v1)
//!
//! A stateless forwarding proxy built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request  GET /https://example.com/data.json
//!     ─────────────────────┐
//!                          ▼
//!     ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌──────────┐
//!     │ routing  │──▶│ routing  │──▶│  security  │──▶│ upstream │──▶│   http   │
//!     │ extract  │   │ validate │   │ allow/block│   │  fetch   │   │ response │
//!     └──────────┘   └──────────┘   └────────────┘   └──────────┘   └────┬─────┘
//!                                                                        │
//!     Client Response (upstream status/body + CORS headers)  ◀───────────┘
//! ```
//!
//! Configuration comes from `CORS_RELAY_*` environment variables and an
//! optional TOML file named by `CORS_RELAY_CONFIG`.

use tokio::net::TcpListener;

use cors_relay::config::load_from_env;
use cors_relay::lifecycle::{wait_for_shutdown_signal, Shutdown};
use cors_relay::observability::{init_logging, metrics};
use cors_relay::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;

    init_logging(&config.observability);

    tracing::info!("cors-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        require_origin = config.access.require_origin,
        destination_allow = config.access.destination.allow_list.len(),
        destination_block = config.access.destination.block_list.len(),
        origin_allow = config.access.origin.allow_list.len(),
        origin_block = config.access.origin.block_list.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
