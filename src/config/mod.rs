//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks, pattern compilation)
//!     → GateConfig (validated, immutable)
//!     → lifecycle::startup compiles the RuleSet and shares it via Arc
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_routes, ConfigError};
pub use schema::{
    DeprecatedApiConfig, GateConfig, ListenerConfig, LogFormat, ObservabilityConfig,
    PatternEntry, RoutesFile, TimeoutConfig,
};
pub use validation::{compile_rules, ValidationError};
