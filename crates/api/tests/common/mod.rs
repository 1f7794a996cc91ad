//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router
//! without an actual TCP listener. The router is built via
//! [`build_app_router`] so tests exercise the same middleware stack
//! (CORS, request ID, timeout, tracing, panic recovery) that production uses.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use immopilot_api::auth::jwt::{generate_token, JwtConfig};
use immopilot_api::config::ServerConfig;
use immopilot_api::router::build_app_router;
use immopilot_api::state::AppState;

/// Webhook signing secret used by [`test_config`] and the webhook tests.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test";

/// JWT secret used by [`test_config`] and [`auth_token`].
const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:5173".to_string(),
        public_dir: "public".to_string(),
        checkout_success_url: "http://localhost:5173/konto/anzeigen?checkout=success".to_string(),
        checkout_cancel_url: "http://localhost:5173/konto/anzeigen?checkout=cancel".to_string(),
        payment_webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Vendor integrations (payments, syndication, mail)
/// are absent, as in a dev environment without credentials.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        payments: None,
        syndication: None,
        mailer: None,
    };
    build_app_router(state, &config)
}

/// Mint a bearer token for `user_id`, signed with the test JWT secret.
pub fn auth_token(user_id: Uuid) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    };
    generate_token(user_id, Some("owner@example.com"), &config)
        .expect("test token generation must succeed")
}

/// Send a GET request, optionally authenticated.
pub async fn get(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    send(app, "GET", path, token, None).await
}

/// Send a POST request with a JSON body, optionally authenticated.
pub async fn post_json(
    app: Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "POST", path, token, Some(body)).await
}

/// Send a PUT request with a JSON body, optionally authenticated.
pub async fn put_json(
    app: Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, "PUT", path, token, Some(body)).await
}

/// Send a DELETE request, optionally authenticated.
pub async fn delete(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    send(app, "DELETE", path, token, None).await
}

async fn send(
    app: Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body was not valid JSON: {e}: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Create a listing via the API and return its JSON representation.
///
/// `ui_status` of `Some("entwurf")` creates a draft; `None` leaves the
/// default `zahlung_ausstehend`.
pub async fn create_listing(
    pool: &PgPool,
    token: &str,
    title: &str,
    ui_status: Option<&str>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "transaction_type": "sale",
        "usage_type": "residential",
        "title": title,
        "city": "Berlin",
        "price_cents": 35_000_000,
    });
    if let Some(status) = ui_status {
        body["ui_status"] = serde_json::Value::String(status.to_string());
    }

    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/listings", Some(token), body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
