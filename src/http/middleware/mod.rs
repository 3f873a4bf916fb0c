//! Request middleware.

pub mod deprecated_api;

pub use deprecated_api::{deprecated_api_middleware, disable_deprecated_api};
