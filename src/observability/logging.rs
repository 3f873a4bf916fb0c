//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Pick the log filter from `RUST_LOG` or configuration
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, text format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Filter used when neither `RUST_LOG` nor the config yields a valid one.
const FALLBACK_FILTER: &str = "deprecated_api_gate=info,tower_http=info";

/// Build the filter: `RUST_LOG` wins, then `log_level`, then the fallback.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(rust_log.as_deref(), config)
}

fn filter_from(rust_log: Option<&str>, config: &ObservabilityConfig) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(&config.log_level).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observability(log_level: &str) -> ObservabilityConfig {
        ObservabilityConfig {
            log_level: log_level.into(),
            log_format: LogFormat::Text,
        }
    }

    #[test]
    fn test_filter_from_config() {
        let filter = filter_from(None, &observability("debug"));
        assert_eq!(filter.to_string(), EnvFilter::new("debug").to_string());
    }

    #[test]
    fn test_rust_log_wins() {
        let filter = filter_from(Some("warn"), &observability("debug"));
        assert_eq!(filter.to_string(), EnvFilter::new("warn").to_string());

        let filter = filter_from(Some("gate=loud"), &observability("debug"));
        assert_eq!(filter.to_string(), EnvFilter::new("debug").to_string());
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let filter = filter_from(None, &observability("gate=loud"));
        assert_eq!(filter.to_string(), EnvFilter::new(FALLBACK_FILTER).to_string());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = ObservabilityConfig::default();
        init(&config);
        init(&config);
    }
}
