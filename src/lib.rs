//! CORS relay library.
//!
//! Fetches the URL embedded in an inbound request path and returns the
//! response with permissive CORS headers, subject to destination and
//! origin allow/block lists.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
