//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "CORS_RELAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {message}")]
    Env { key: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let config = read_config_file(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    tracing::debug!(path = ?path, "Reading config file");
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the process configuration once at startup.
///
/// Defaults, then the file named by `CORS_RELAY_CONFIG` (if set), then
/// `CORS_RELAY_*` environment overrides. The result is validated.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] with an explicit variable lookup.
pub fn resolve<F>(lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup(CONFIG_PATH_ENV) {
        Some(path) if !path.trim().is_empty() => read_config_file(&PathBuf::from(path))?,
        _ => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, &lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay `CORS_RELAY_*` variables onto an existing configuration.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("CORS_RELAY_BIND_ADDRESS") {
        config.listener.bind_address = v.trim().to_string();
    }
    if let Some(v) = lookup("CORS_RELAY_DESTINATION_ALLOW_LIST") {
        config.access.destination.allow_list = split_list(&v);
    }
    if let Some(v) = lookup("CORS_RELAY_DESTINATION_BLOCK_LIST") {
        config.access.destination.block_list = split_list(&v);
    }
    if let Some(v) = lookup("CORS_RELAY_ORIGIN_ALLOW_LIST") {
        config.access.origin.allow_list = split_list(&v);
    }
    if let Some(v) = lookup("CORS_RELAY_ORIGIN_BLOCK_LIST") {
        config.access.origin.block_list = split_list(&v);
    }
    if let Some(v) = lookup("CORS_RELAY_REQUIRE_ORIGIN") {
        config.access.require_origin = parse_flag(&v);
    }
    if let Some(v) = lookup("CORS_RELAY_LOG_LEVEL") {
        config.observability.log_level = v.trim().to_string();
    }
    if let Some(v) = lookup("CORS_RELAY_LOG_FORMAT") {
        config.observability.log_format = v.parse().map_err(|message| ConfigError::Env {
            key: "CORS_RELAY_LOG_FORMAT",
            message,
        })?;
    }
    if let Some(v) = lookup("CORS_RELAY_METRICS_ENABLED") {
        config.observability.metrics_enabled = parse_flag(&v);
    }
    if let Some(v) = lookup("CORS_RELAY_METRICS_ADDRESS") {
        config.observability.metrics_address = v.trim().to_string();
    }
    Ok(())
}

/// Split a comma-separated hostname list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    let v = raw.trim();
    v.eq_ignore_ascii_case("true") || v == "1"
}
