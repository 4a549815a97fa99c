#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rocketlab_api::auth::password::hash_password;
use rocketlab_api::auth::token::TokenConfig;
use rocketlab_api::config::ServerConfig;
use rocketlab_api::router::build_app_router;
use rocketlab_api::state::AppState;
use rocketlab_core::roles::OperatorRole;
use rocketlab_db::models::operator::{NewOperator, Operator};
use rocketlab_db::repositories::OperatorRepo;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        token: TokenConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            session_ttl_hours: 12,
        },
    }
}

/// Full application router, same middleware stack as production.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Insert an operator whose password is [`TEST_PASSWORD`].
pub async fn create_operator(pool: &PgPool, username: &str, role: OperatorRole) -> Operator {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    OperatorRepo::create(
        pool,
        &NewOperator {
            username,
            password_hash: &password_hash,
            role,
        },
    )
    .await
    .expect("operator creation should succeed")
}

/// Sign in through the API and return the `data` object of the response.
pub async fn login(app: Router, username: &str) -> Value {
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut json = body_json(response).await;
    json["data"].take()
}

/// Create an operator and return an access token for them.
pub async fn token_for(pool: &PgPool, username: &str, role: OperatorRole) -> String {
    create_operator(pool, username, role).await;
    let json = login(build_test_app(pool.clone()), username).await;
    json["access_token"]
        .as_str()
        .expect("access_token present")
        .to_string()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, json_request("PATCH", uri, Some(token), &body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
