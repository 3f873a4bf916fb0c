//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → request.rs (assign / propagate X-Request-ID)
//!     → middleware/deprecated_api.rs (RuleSet decision)
//!         declined → response.rs (404 JSON error body)
//!         allowed  → application handler
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use middleware::{deprecated_api_middleware, disable_deprecated_api};
pub use request::X_REQUEST_ID;
pub use response::{ErrorResponse, DEPRECATED_API_DISABLED_PHRASE};
pub use router::{ApiRouter, RouteRegistry, UnsupportedMethod};
pub use server::HttpServer;
