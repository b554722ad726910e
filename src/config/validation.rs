//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges (timeouts > 0)
//! - Upstream fetch must time out before the inbound request does
//! - Reject hostname entries that can never match a parsed URL host
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{HostListConfig, ProxyConfig, TimeoutConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("timeouts.upstream_secs ({upstream_secs}) must be less than timeouts.request_secs ({request_secs})")]
    UpstreamOutlivesRequest { upstream_secs: u64, request_secs: u64 },

    #[error("{field}: '{value}' is not a valid hostname entry")]
    InvalidHostname { field: &'static str, value: String },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let timeouts = [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.upstream_secs", config.timeouts.upstream_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout { field });
        }
    }

    let TimeoutConfig {
        upstream_secs,
        request_secs,
        ..
    } = config.timeouts;
    if upstream_secs >= request_secs {
        errors.push(ValidationError::UpstreamOutlivesRequest {
            upstream_secs,
            request_secs,
        });
    }

    check_hosts(&mut errors, "access.destination", &config.access.destination);
    check_hosts(&mut errors, "access.origin", &config.access.origin);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_hosts(errors: &mut Vec<ValidationError>, field: &'static str, lists: &HostListConfig) {
    for host in lists.allow_list.iter().chain(lists.block_list.iter()) {
        let bad = host.is_empty()
            || host
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == ',');
        if bad {
            errors.push(ValidationError::InvalidHostname {
                field,
                value: host.clone(),
            });
        }
    }
}
