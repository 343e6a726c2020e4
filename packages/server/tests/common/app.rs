//! In-process HTTP client for the router.
//!
//! Requests go straight through `tower::ServiceExt::oneshot`, so no socket is
//! bound and every handler sees mock dependencies from `TestDependencies`.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use portfolio_core::kernel::TestDependencies;
use portfolio_core::server::{build_app, AppOptions, AxumAppState};
use serde_json::Value;
use tower::ServiceExt;

/// Status and decoded JSON body of one response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// Shortcut for the `error` field of an error body
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

pub struct TestApp {
    pub deps: TestDependencies,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_deps(TestDependencies::new())
    }

    pub fn with_deps(deps: TestDependencies) -> Self {
        let state = AxumAppState::new(deps.server_deps(), None);
        let router = build_app(state, &AppOptions::default());
        Self { deps, router }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.post_json_with_headers(path, body, &[]).await
    }

    pub async fn post_json_with_headers(
        &self,
        path: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        self.send(request).await
    }

    /// POST a raw, possibly malformed, body
    pub async fn post_raw(&self, path: &str, body: &'static str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }
}
