//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::RouteDescriptor;

/// Root configuration for the deprecated API gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Deprecated REST API rules.
    pub deprecated_api: DeprecatedApiConfig,
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

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` string). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Text for development, JSON for log aggregation.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

/// Deprecated REST API gating.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeprecatedApiConfig {
    /// When true, requests matching `patterns` are declined with 404.
    /// Overridden by the `DEPRECATED_API_DISABLED` environment variable.
    pub disabled: bool,

    /// Disabled patterns, in configuration order. Repeated patterns merge.
    pub patterns: Vec<PatternEntry>,
}

/// One disabled pattern entry.
///
/// Either a table or the inline form `"/api/v1/items/+ [GET, DELETE]"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PatternEntry {
    Inline(String),
    Table { path: String, methods: Vec<String> },
}

impl PatternEntry {
    pub fn table<I, S>(path: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PatternEntry::Table {
            path: path.into(),
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    /// Split the entry into its pattern and method list.
    ///
    /// Returns `None` for an inline entry without a trailing `[...]` list.
    pub fn parts(&self) -> Option<(&str, Vec<&str>)> {
        match self {
            PatternEntry::Table { path, methods } => {
                Some((path.as_str(), methods.iter().map(String::as_str).collect()))
            }
            PatternEntry::Inline(raw) => {
                let raw = raw.trim();
                let list = raw.strip_suffix(']')?;
                let open = list.rfind('[')?;
                let methods = list[open + 1..].split(',').map(str::trim).collect();
                Some((list[..open].trim(), methods))
            }
        }
    }
}

/// Routes file used by the `serve` and `report` commands.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutesFile {
    pub routes: Vec<RouteDescriptor>,
}
