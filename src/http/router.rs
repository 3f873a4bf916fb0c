//! Axum router builder that records its route table.
//!
//! Axum does not expose the routes it holds, so every registration goes
//! through [`ApiRouter`], which keeps a [`RouteRegistry`] alongside the
//! router for the endpoint reporter.

use axum::{
    handler::Handler,
    http::Method,
    routing::{on, MethodFilter},
    Router,
};

use crate::routing::{RouteDescriptor, RouteTable};

/// Route table captured while building an [`ApiRouter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRegistry {
    routes: Vec<RouteDescriptor>,
}

impl RouteRegistry {
    /// Record `method` on `path`. Returns false if the pair was already held.
    fn record(&mut self, path: &str, method: &Method) -> bool {
        let method = method.as_str().to_string();
        match self.routes.iter_mut().find(|r| r.path == path) {
            Some(route) if route.methods.contains(&method) => false,
            Some(route) => {
                route.methods.push(method);
                true
            }
            None => {
                self.routes.push(RouteDescriptor::new(path, [method]));
                true
            }
        }
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.path == path && r.methods.iter().any(|m| m == method.as_str()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteTable for RouteRegistry {
    fn routes(&self) -> Vec<RouteDescriptor> {
        self.routes.clone()
    }
}

/// Method has no axum `MethodFilter` (e.g. extension methods).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP method `{0}` cannot be routed")]
pub struct UnsupportedMethod(pub String);

/// Router builder that mirrors each registration into a [`RouteRegistry`].
pub struct ApiRouter<S = ()> {
    router: Router<S>,
    registry: RouteRegistry,
}

impl<S> ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            registry: RouteRegistry::default(),
        }
    }

    /// Register `handler` for `method` on `path` (axum path syntax).
    pub fn on<H, T>(self, method: Method, path: &str, handler: H) -> Result<Self, UnsupportedMethod>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| UnsupportedMethod(method.to_string()))?;
        Ok(self.register(method, filter, path, handler))
    }

    pub fn get<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(Method::GET, MethodFilter::GET, path, handler)
    }

    pub fn post<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(Method::POST, MethodFilter::POST, path, handler)
    }

    pub fn put<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(Method::PUT, MethodFilter::PUT, path, handler)
    }

    pub fn patch<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(Method::PATCH, MethodFilter::PATCH, path, handler)
    }

    pub fn delete<H, T>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.register(Method::DELETE, MethodFilter::DELETE, path, handler)
    }

    /// Routes registered so far.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn into_parts(self) -> (Router<S>, RouteRegistry) {
        (self.router, self.registry)
    }

    fn register<H, T>(
        mut self,
        method: Method,
        filter: MethodFilter,
        path: &str,
        handler: H,
    ) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        if !self.registry.record(path, &method) {
            tracing::warn!(%method, path, "Route already registered, keeping the first handler");
            return self;
        }
        self.router = self.router.route(path, on(filter, handler));
        self
    }
}

impl<S> Default for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok() -> &'static str {
        "ok"
    }

    #[test]
    fn test_registry_merges_methods_per_path() {
        let api: ApiRouter = ApiRouter::new()
            .get("/api/users/{id}", ok)
            .post("/api/users/{id}", ok)
            .delete("/api/items", ok);

        assert_eq!(
            api.registry().routes(),
            vec![
                RouteDescriptor::new("/api/users/{id}", ["GET", "POST"]),
                RouteDescriptor::new("/api/items", ["DELETE"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_handler() {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        async fn second() -> &'static str {
            "second"
        }

        let api: ApiRouter = ApiRouter::new()
            .get("/a", ok)
            .get("/a", second)
            .post("/a", ok);
        assert!(api.registry().contains(&Method::GET, "/a"));
        assert!(!api.registry().contains(&Method::PUT, "/a"));
        assert_eq!(
            api.registry().routes(),
            vec![RouteDescriptor::new("/a", ["GET", "POST"])]
        );

        let (router, _) = api.into_parts();
        let request = Request::builder().uri("/a").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[test]
    fn test_on_rejects_extension_methods() {
        let method = Method::from_bytes(b"PURGE").unwrap();
        let err = ApiRouter::<()>::new().on(method, "/cache", ok).err().unwrap();
        assert_eq!(err, UnsupportedMethod("PURGE".into()));

        let api = ApiRouter::<()>::new().on(Method::PUT, "/cache", ok).unwrap();
        assert_eq!(api.registry().len(), 1);
    }
}
