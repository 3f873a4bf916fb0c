//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Freeze the application's routes and their route table
//! - Install the deprecated API gate when enabled
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown signal fires

use axum::Router;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GateConfig;
use crate::http::middleware::disable_deprecated_api;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::router::{ApiRouter, RouteRegistry};
use crate::lifecycle::startup::{prepare_gate, StartupError};

/// HTTP server hosting the gated application routes.
pub struct HttpServer {
    router: Router,
    registry: RouteRegistry,
    config: GateConfig,
}

impl HttpServer {
    /// Create a server for `api` under the given configuration.
    ///
    /// Fails when the disabled patterns do not compile.
    pub fn new(config: GateConfig, api: ApiRouter) -> Result<Self, StartupError> {
        let (router, registry) = api.into_parts();

        let router = match prepare_gate(&config.deprecated_api, &registry)? {
            Some(rules) => disable_deprecated_api(router, rules),
            None => router,
        };

        let router = Self::build_router(&config, router);
        Ok(Self {
            router,
            registry,
            config,
        })
    }

    /// Wrap the application router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, router: Router) -> Router {
        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.registry.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Routes registered by the application.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
