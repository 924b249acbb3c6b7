//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Tenant resolution settings.
    pub tenant: TenantConfig,

    /// Backend origins for the fixed path routes.
    pub origins: OriginsConfig,

    /// Front-end origins used by the fallback route.
    pub frontend: FrontendConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
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

/// Tenant resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TenantConfig {
    /// Domain suffix stripped from the hostname to obtain the tenant id
    /// (e.g., "ninechat.com.br"). Written without a leading dot.
    pub base_domain: String,
}

/// Upstream origins, each an absolute URL with an optional base path.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OriginsConfig {
    /// Target for `/api/v1/*`.
    pub api_v1: String,

    /// Target for `/socket.io/*` (WebSocket and long-polling).
    pub ws: String,

    /// Target for the exact path `/emit`.
    pub emit: String,
}

/// Front-end origins for requests that match no path rule.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrontendConfig {
    /// Origin used when the hostname has no entry in `hosts`.
    pub default_origin: String,

    /// Exact hostname to origin overrides.
    pub hosts: HashMap<String, String>,
}

impl FrontendConfig {
    /// Origin serving the front-end for `host`.
    pub fn origin_for(&self, host: &str) -> &str {
        self.hosts
            .get(host)
            .map(String::as_str)
            .unwrap_or(&self.default_origin)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Output format for log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
