//! Deprecated API middleware.
//! Declines requests to disabled deprecated endpoints before any handler runs.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;

use crate::http::request::X_REQUEST_ID;
use crate::http::response::ErrorResponse;
use crate::routing::RuleSet;

pub async fn deprecated_api_middleware(
    State(rules): State<Arc<RuleSet>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();
    if !rules.is_disabled(req.method().as_str(), path) {
        return next.run(req).await;
    }

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok());

    tracing::debug!(
        request_id = ?request_id,
        method = %req.method(),
        path = %path,
        "Declined request to disabled deprecated API"
    );

    ErrorResponse::deprecated_api_disabled(req.method(), path, request_id).into_response()
}

/// Install the gate on every route of `router`.
pub fn disable_deprecated_api<S>(router: Router<S>, rules: Arc<RuleSet>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(rules, deprecated_api_middleware))
}
