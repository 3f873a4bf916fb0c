//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GateConfig, RoutesFile};
use crate::config::validation::{validate_config, validate_routes, ValidationError};

/// Environment variable that switches deprecated API gating on or off.
pub const DEPRECATED_API_DISABLED_ENV: &str = "DEPRECATED_API_DISABLED";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("{name} must be `true` or `false`, got `{value}`")]
    Env { name: &'static str, value: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides and validate configuration text.
pub fn parse_config(content: &str) -> Result<GateConfig, ConfigError> {
    let mut config: GateConfig = toml::from_str(content)?;
    apply_env_overrides_from(&mut config, |name| std::env::var(name).ok())?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides_from<F>(config: &mut GateConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(DEPRECATED_API_DISABLED_ENV) {
        config.deprecated_api.disabled = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                return Err(ConfigError::Env {
                    name: DEPRECATED_API_DISABLED_ENV,
                    value,
                })
            }
        };
    }
    Ok(())
}

/// Load and validate a routes file.
pub fn load_routes(path: &Path) -> Result<RoutesFile, ConfigError> {
    let content = fs::read_to_string(path)?;
    let routes: RoutesFile = toml::from_str(&content)?;

    validate_routes(&routes).map_err(ConfigError::Validation)?;

    Ok(routes)
}
