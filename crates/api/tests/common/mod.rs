use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use frontdesk_api::config::{AppEnv, DirectoryConfig, ServerConfig, SlackConfig};
use frontdesk_api::notifications::NotificationDispatcher;
use frontdesk_api::router::build_app_router;
use frontdesk_api::state::AppState;
use frontdesk_core::signature::SignatureVerifier;

/// Signing secret used by all webhook tests.
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout. Slack delivery and the directory API
/// stay unconfigured; only the signing secret is set so signature
/// verification is active.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        env: AppEnv::Development,
        slack: SlackConfig {
            bot_token: None,
            channel_id: None,
            signing_secret: Some(TEST_SIGNING_SECRET.to_string()),
        },
        directory: DirectoryConfig {
            base_url: None,
            access_token: None,
            sync_interval_hours: 24,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through [`build_app_router`] so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let verifier = SignatureVerifier::new(config.slack.signing_secret.clone(), false);
    let dispatcher = Arc::new(NotificationDispatcher::new(pool.clone(), None));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        verifier,
        slack: None,
        dispatcher,
    };

    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a correctly signed webhook POST to the Slack actions endpoint.
pub async fn post_signed(app: Router, uri: &str, body: String) -> Response<Body> {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = frontdesk_core::signature::sign(TEST_SIGNING_SECRET, &timestamp, body.as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-slack-request-timestamp", timestamp)
        .header("x-slack-signature", signature)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Wrap an interactivity payload document the way Slack delivers it:
/// form-encoded with the JSON under a `payload` field.
pub fn form_encode_payload(payload: &serde_json::Value) -> String {
    serde_urlencoded::to_string([("payload", payload.to_string())]).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
