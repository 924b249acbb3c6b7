//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => RouterConfig::default(),
    };

    let mut errors = match apply_env_overrides(&mut config, |key| std::env::var(key).ok()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };
    if let Err(invalid) = validate_config(&config) {
        errors.extend(invalid);
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment values onto `config`.
///
/// `lookup` resolves a variable name; empty values are ignored.
/// `PAGES_HOST` holds comma-separated `host=origin` pairs merged into
/// `frontend.hosts`. Malformed `PAGES_HOST` entries and unknown `LOG_FORMAT`
/// values are returned as errors; every well-formed value is still applied.
pub fn apply_env_overrides<F>(
    config: &mut RouterConfig,
    lookup: F,
) -> Result<(), Vec<ValidationError>>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut errors = Vec::new();

    if let Some(v) = get("BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = get("BASE_DOMAIN") {
        config.tenant.base_domain = v;
    }
    if let Some(v) = get("API_V1_ORIGIN") {
        config.origins.api_v1 = v;
    }
    if let Some(v) = get("WS_ORIGIN") {
        config.origins.ws = v;
    }
    if let Some(v) = get("EMIT_ORIGIN") {
        config.origins.emit = v;
    }
    if let Some(v) = get("PAGES_DEFAULT") {
        config.frontend.default_origin = v;
    }
    if let Some(v) = get("PAGES_HOST") {
        for pair in v.split(',') {
            match pair.split_once('=') {
                Some((host, origin)) if !host.trim().is_empty() && !origin.trim().is_empty() => {
                    config
                        .frontend
                        .hosts
                        .insert(host.trim().to_string(), origin.trim().to_string());
                }
                _ if pair.trim().is_empty() => {}
                _ => errors.push(ValidationError::MalformedHostOverride(pair.trim().to_string())),
            }
        }
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = get("LOG_FORMAT") {
        match v.parse() {
            Ok(format) => config.observability.log_format = format,
            Err(_) => errors.push(ValidationError::InvalidLogFormat(v)),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
