//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use deprecated_api_gate::config::{load_config, GateConfig};
use deprecated_api_gate::ApiRouter;

pub const GROUPS: [&str; 3] = [
    "/deprecated-api/v1/test",
    "/deprecated-api/v2/test",
    "/deprecated-api/v3/test",
];

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn gate_config() -> GateConfig {
    load_config(&fixture("deprecated-api.toml")).unwrap()
}

async fn ok() -> &'static str {
    "ok"
}

/// Three identical route groups; only v1 and v2 are configured as disabled.
pub fn group_api() -> ApiRouter {
    let mut api: ApiRouter = ApiRouter::new();
    for group in GROUPS {
        api = api
            .get(group, ok)
            .post(group, ok)
            .get(&format!("{group}/inner"), ok)
            .get(&format!("{group}/inner/wildcard"), ok)
            .get(&format!("{group}/inner/wildcard/{{param}}"), ok)
            .get(&format!("{group}/inner/wildcard-plus/{{*rest}}"), ok)
            .get(&format!("{group}/inner/wildcard-star/{{any}}"), ok)
            .get(&format!("{group}/inner/extension/{{file}}"), ok);
    }
    api
}

/// Send one request through `router` and return status and body text.
pub async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
