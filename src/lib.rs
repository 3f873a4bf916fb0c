//! Deprecated REST API gate.
//!
//! Declines requests to configured deprecated endpoints with a structured
//! 404 before they reach their handlers, and reports which registered routes
//! the configuration disables.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::GateConfig;
pub use http::{ApiRouter, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{disabled_endpoints, RouteDescriptor, RouteTable, RuleSet, UrlPattern};
