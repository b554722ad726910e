//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file named by CORS_RELAY_CONFIG (loader.rs)
//!     → CORS_RELAY_* environment overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc with the request handler
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup and never re-read by handlers
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    AccessConfig, HostListConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    SecurityConfig, TimeoutConfig, UpstreamConfig,
};
