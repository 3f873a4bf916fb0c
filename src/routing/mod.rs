//! Rule-matching subsystem.
//!
//! # Data Flow
//! ```text
//! Rule Compilation (at startup):
//!     [deprecated_api].patterns
//!     → pattern.rs (compile segments, fail fast on bad input)
//!     → rules.rs (merge methods per pattern)
//!     → Freeze as immutable RuleSet
//!
//! Incoming Request (method, path)
//!     → rules.rs (any rule matches path AND lists method?)
//!     → Return: declined / allowed
//!
//! Diagnostics:
//!     RouteTable snapshot + RuleSet
//!     → report.rs (normalize templates, intersect methods)
//!     → Sorted "<path> [<METHODS>]" lines
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex: segment-wise matching only
//! - Deterministic: same input always yields the same decision and report

pub mod pattern;
pub mod report;
pub mod route_table;
pub mod rules;

pub use pattern::{PatternError, UrlPattern};
pub use report::{disabled_endpoint_records, disabled_endpoints, DisabledEndpoint};
pub use route_table::{RouteDescriptor, RouteTable, PARAM_PLACEHOLDER};
pub use rules::{Rule, RuleSet, RuleSetBuilder};
