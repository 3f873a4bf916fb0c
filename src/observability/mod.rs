//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//! ```
//!
//! # Design Decisions
//! - Structured fields (method, path, request_id) instead of interpolated text
//! - Request ID flows through all HTTP log events via tower-http layers

pub mod logging;
