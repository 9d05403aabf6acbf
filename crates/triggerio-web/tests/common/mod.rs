//! Common test utilities for the dashboard router tests

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::field_reassign_with_default
)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, Response, header},
};
use std::sync::Once;
use tower::ServiceExt;
use triggerio_core::Config;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Auth service the gate redirects to in tests
pub const AUTH_URL: &str = "https://auth.example.com/login";

/// Session cookie for token `abc123`
pub const SESSION_COOKIE: &str = "triggerio_token=abc123";

/// Initialize test logging once
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointing the fetcher at a mock backend
pub fn test_config(backend: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = backend.uri();
    config.api.request_timeout = 5;
    config.auth.auth_url = AUTH_URL.to_string();
    config
}

/// Router wired to a mock backend
pub fn app_for(backend: &MockServer) -> Router {
    init_test_logging();
    triggerio_web::build_app(test_config(backend)).unwrap()
}

/// Send one request through the router
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
) -> Response<Body> {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// GET with an optional cookie
pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, cookie).await
}

/// Response header as a string
pub fn header_str<'a>(response: &'a Response<Body>, name: header::HeaderName) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Collect the response body
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
