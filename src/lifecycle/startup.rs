//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the deprecated API rules from configuration
//! - Log every registered endpoint the rules disable
//! - Refuse to start on a rule set that does not compile
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The report runs once, after all routes are registered

use std::sync::Arc;

use thiserror::Error;

use crate::config::{compile_rules, ConfigError, DeprecatedApiConfig};
use crate::http::router::UnsupportedMethod;
use crate::routing::{disabled_endpoints, RuleSet, RouteTable};

/// Errors that stop the process before it serves traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Route(#[from] UnsupportedMethod),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compile the rule set when gating is enabled and log what it disables.
///
/// Returns `None` when gating is off.
pub fn prepare_gate<T>(
    config: &DeprecatedApiConfig,
    routes: &T,
) -> Result<Option<Arc<RuleSet>>, StartupError>
where
    T: RouteTable + ?Sized,
{
    if !config.disabled {
        tracing::info!("Deprecated REST API gating is off");
        return Ok(None);
    }

    let rules = compile_rules(config).map_err(ConfigError::Validation)?;
    tracing::info!(rules = rules.len(), "Deprecated REST API gating is on");

    for line in disabled_endpoints(routes, &rules) {
        tracing::info!(endpoint = %line, "Deprecated REST API is disabled");
    }

    Ok(Some(Arc::new(rules)))
}
