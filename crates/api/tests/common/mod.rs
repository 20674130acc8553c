use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vitrina_api::config::ServerConfig;
use vitrina_api::router::build_app_router;
use vitrina_api::state::AppState;
use vitrina_store::{ImageStore, JsonStore};

/// Build a test `ServerConfig` with safe defaults rooted in `dir`.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. The bot is left unconfigured.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        data_dir: dir.join("data"),
        image_dir: dir.join("images"),
        bot_token: None,
        public_url: "http://127.0.0.1:3000".to_string(),
        pending_ttl_secs: 3600,
        forward_timeout_secs: 10,
    }
}

/// Build the full application router with all middleware layers, backed by
/// JSON stores under `dir`.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(dir: &Path) -> Router {
    let config = test_config(dir);

    let state = AppState {
        store: Arc::new(JsonStore::new(&config.data_dir)),
        images: Arc::new(ImageStore::new(&config.image_dir)),
        config: Arc::new(config.clone()),
        bot: None,
    };

    build_app_router(state, &config)
}

/// One-shot GET request against the test app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// One-shot POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
