#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use sessiond::{
    app::build_app,
    config::Config,
    models::user::User,
    repositories::memory::{MemorySessionStore, MemoryTokenDenylist, MemoryUserStore},
    services::SessionLifecycle,
    state::AppState,
    utils::{jwt::TokenIssuer, password::hash_password},
};

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused-in-tests".to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_expiration_minutes: 30,
        refresh_token_expiration_days: 7,
        port: 0,
    }
}

/// App state backed entirely by in-memory stores.
pub fn test_state() -> AppState {
    let config = test_config();
    let lifecycle = SessionLifecycle::new(
        Arc::new(MemorySessionStore::new()),
        Arc::new(MemoryTokenDenylist::new()),
        TokenIssuer::new(config.auth()),
    );
    AppState::new(Arc::new(MemoryUserStore::new()), lifecycle, config)
}

pub fn test_app(state: &AppState) -> Router {
    build_app(state.clone())
}

pub async fn seed_user(state: &AppState, email: &str, password: &str) -> User {
    let hash = hash_password(password).expect("hash password");
    state
        .users
        .create(User::new(email.to_string(), hash, "Test User".to_string()))
        .await
        .expect("seed user")
}

pub async fn seed_inactive_user(state: &AppState, email: &str, password: &str) -> User {
    let hash = hash_password(password).expect("hash password");
    let mut user = User::new(email.to_string(), hash, "Inactive User".to_string());
    user.is_active = false;
    state.users.create(user).await.expect("seed inactive user")
}

pub async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    send(app, "GET", uri, bearer, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    bearer: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    send(app, "POST", uri, bearer, Some(body)).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Registers a fresh account through the API and returns the response
/// body (`access`, `refresh`, `user`).
pub async fn register(app: &Router, email: &str, device_name: Option<&str>) -> Value {
    let mut body = serde_json::json!({
        "email": email,
        "name": "Test User",
        "password": "testpass123",
    });
    if let Some(device) = device_name {
        body["device_name"] = Value::String(device.to_string());
    }
    let (status, json) = post_json(app, "/auth/register", None, body).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
    json
}

/// Logs in through the API and returns the response body (`access`,
/// `refresh`, `session_id`, `user`).
pub async fn login(app: &Router, email: &str, password: &str, device_name: Option<&str>) -> Value {
    let mut body = serde_json::json!({ "email": email, "password": password });
    if let Some(device) = device_name {
        body["device_name"] = Value::String(device.to_string());
    }
    let (status, json) = post_json(app, "/auth/login", None, body).await;
    assert_eq!(status, StatusCode::OK, "login failed: {json}");
    json
}
