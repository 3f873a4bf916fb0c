//! Structured error responses.
//!
//! # Responsibilities
//! - Build the JSON body returned for declined deprecated API calls
//! - Reuse the caller's X-Request-ID as the error id when present
//!
//! # Design Decisions
//! - The message names the request, never the rule that declined it
//! - Always 404 so disabled endpoints look absent to clients

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed phrase carried by every declined-request message.
pub const DEPRECATED_API_DISABLED_PHRASE: &str =
    "is declined with 404 Not Found, because the following deprecated REST API is disabled";

/// Error code for declined deprecated API calls.
pub const DEPRECATED_API_DISABLED_CODE: &str = "DEPRECATED-API-DISABLED";

const ERROR_RESPONSE_TYPE: &str = "NC.TMFErrorResponse.v1.0";

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub id: String,
    pub code: String,
    pub reason: String,
    pub message: String,
    pub status: String,
    #[serde(rename = "@type")]
    pub kind: String,
}

impl ErrorResponse {
    /// Body for a request declined by the deprecated API gate.
    pub fn deprecated_api_disabled(method: &Method, path: &str, request_id: Option<&str>) -> Self {
        let request = format!("{} {}", method, path);
        Self {
            id: request_id
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            code: DEPRECATED_API_DISABLED_CODE.to_string(),
            reason: StatusCode::NOT_FOUND
                .canonical_reason()
                .unwrap_or("Not Found")
                .to_string(),
            message: format!(
                "Request [{}] {}: [{}]",
                request, DEPRECATED_API_DISABLED_PHRASE, request
            ),
            status: StatusCode::NOT_FOUND.as_u16().to_string(),
            kind: ERROR_RESPONSE_TYPE.to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, Json(self)).into_response()
    }
}
