//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive `Deserialize` for loading from config files.

use serde::Deserialize;

/// Root configuration for the CORS relay.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Destination and origin allow/block lists.
    pub access: AccessConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Inbound request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one upstream fetch, body included, in seconds.
    pub upstream_secs: u64,

    /// Request timeout (total time for inbound request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 25,
            request_secs: 30,
        }
    }
}

/// Access control lists for destinations and origins.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AccessConfig {
    /// Lists applied to the hostname of the proxied URL.
    pub destination: HostListConfig,

    /// Lists applied to the hostname of the `Origin`/`X-Requested-With` value.
    pub origin: HostListConfig,

    /// Reject requests that carry neither `Origin` nor `X-Requested-With`.
    pub require_origin: bool,
}

/// An allow-list / block-list pair of hostnames.
///
/// A non-empty allow-list is exclusive and is checked before the block-list.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HostListConfig {
    pub allow_list: Vec<String>,
    pub block_list: Vec<String>,
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// User-Agent sent on upstream fetches. `None` uses the client default.
    pub user_agent: Option<String>,

    /// Maximum redirects followed per fetch (0 = never follow).
    pub max_redirects: usize,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for outbound calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            max_redirects: 10,
            system_proxy: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes. Bodies are never forwarded.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}
