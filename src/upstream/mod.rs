//! Upstream fetch subsystem.
//!
//! # Data Flow
//! ```text
//! validated destination URL
//!     → client.rs (GET, follow redirects, buffer body)
//!     → UpstreamResponse (status, headers, bytes)
//!     → http/response.rs (CORS rewrite)
//! ```

pub mod client;

pub use client::{UpstreamClient, UpstreamResponse};
