use axum::http::StatusCode;
use serde_json::json;

mod support;

use support::{
    get, login, post_json, register, seed_inactive_user, seed_user, test_app, test_state,
};

#[tokio::test]
async fn register_returns_tokens_and_creates_a_default_labelled_session() {
    let state = test_state();
    let app = test_app(&state);

    let body = register(&app, "new@example.com", None).await;
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert_eq!(body["user"]["email"], "new@example.com");
    assert!(body["user"].get("password_hash").is_none());

    // The registration call itself opened a session with the fixed
    // placeholder label.
    let access = body["access"].as_str().unwrap();
    let (status, sessions) = get(&app, "/auth/sessions", Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["device_name"], "Registration Device");
    assert_eq!(sessions[0]["revoked"], false);
}

#[tokio::test]
async fn register_honors_the_supplied_device_name() {
    let state = test_state();
    let app = test_app(&state);

    let body = register(&app, "dev@example.com", Some("Chrome on macOS")).await;
    let access = body["access"].as_str().unwrap();
    let (_, sessions) = get(&app, "/auth/sessions", Some(access)).await;
    assert_eq!(sessions[0]["device_name"], "Chrome on macOS");
}

#[tokio::test]
async fn register_duplicate_email_is_a_field_error() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "taken@example.com", "testpass123").await;

    let (status, body) = post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "taken@example.com", "name": "X", "password": "testpass123" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["email"][0], "user with this email already exists.");
}

#[tokio::test]
async fn register_rejects_short_password_and_invalid_email() {
    let state = test_state();
    let app = test_app(&state);

    let (status, body) = post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "ok@example.com", "name": "X", "password": "1234567" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("password").is_some());

    let (status, body) = post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": "not-an-email", "name": "X", "password": "testpass123" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("email").is_some());
}

#[tokio::test]
async fn login_returns_tokens_session_id_and_user() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "alice@example.com", "testpass123").await;

    let body = login(&app, "alice@example.com", "testpass123", Some("Test Device")).await;
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert!(body["session_id"].is_string());
    assert_eq!(body["user"]["email"], "alice@example.com");

    let access = body["access"].as_str().unwrap();
    let (_, sessions) = get(&app, "/auth/sessions", Some(access)).await;
    assert_eq!(sessions[0]["id"], body["session_id"]);
    assert_eq!(sessions[0]["device_name"], "Test Device");
}

#[tokio::test]
async fn login_without_device_name_uses_the_unknown_device_label() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "bob@example.com", "testpass123").await;

    let body = login(&app, "bob@example.com", "testpass123", None).await;
    let access = body["access"].as_str().unwrap();
    let (_, sessions) = get(&app, "/auth/sessions", Some(access)).await;
    assert_eq!(sessions[0]["device_name"], "Unknown Device");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let state = test_state();
    let app = test_app(&state);
    let user = seed_user(&state, "carol@example.com", "testpass123").await;
    seed_inactive_user(&state, "gone@example.com", "testpass123").await;

    let (status, wrong_password) = post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": "carol@example.com", "password": "wrongpass" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["detail"], "Invalid credentials");

    let (status, unknown_email) = post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": "nobody@example.com", "password": "testpass123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, inactive) = post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": "gone@example.com", "password": "testpass123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password, inactive);

    // No session was created by any failed attempt.
    let sessions = state.lifecycle.list_sessions(user.id).await.unwrap();
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn me_requires_a_valid_bearer_token() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "dave@example.com", "testpass123").await;

    let (status, _) = get(&app, "/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app, "/auth/me", Some("garbage-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = login(&app, "dave@example.com", "testpass123", None).await;
    let access = body["access"].as_str().unwrap();
    let (status, me) = get(&app, "/auth/me", Some(access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "dave@example.com");
    assert_eq!(me["name"], "Test User");
    assert!(me["avatar"].is_null());
}

#[tokio::test]
async fn a_refresh_token_does_not_open_protected_routes() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "erin@example.com", "testpass123").await;

    let body = login(&app, "erin@example.com", "testpass123", None).await;
    let refresh = body["refresh"].as_str().unwrap();
    let (status, _) = get(&app, "/auth/me", Some(refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_refresh_field_is_a_bad_request() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "frank@example.com", "testpass123").await;

    let body = login(&app, "frank@example.com", "testpass123", None).await;
    let access = body["access"].as_str().unwrap();

    let (status, response) = post_json(&app, "/auth/logout", Some(access), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["detail"], "Missing refresh token");
}

#[tokio::test]
async fn logout_succeeds_even_with_a_garbage_refresh_token() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "grace@example.com", "testpass123").await;

    let body = login(&app, "grace@example.com", "testpass123", None).await;
    let access = body["access"].as_str().unwrap();

    let (status, response) = post_json(
        &app,
        "/auth/logout",
        Some(access),
        json!({ "refresh": "definitely-not-a-jwt" }),
    )
    .await;
    assert_eq!(status, StatusCode::RESET_CONTENT);
    assert_eq!(response["detail"], "Logged out successfully");
}

#[tokio::test]
async fn logout_revokes_the_current_session() {
    let state = test_state();
    let app = test_app(&state);
    seed_user(&state, "heidi@example.com", "testpass123").await;

    let body = login(&app, "heidi@example.com", "testpass123", None).await;
    let access = body["access"].as_str().unwrap();
    let refresh = body["refresh"].as_str().unwrap();

    let (status, _) =
        post_json(&app, "/auth/logout", Some(access), json!({ "refresh": refresh })).await;
    assert_eq!(status, StatusCode::RESET_CONTENT);

    // The session is now marked revoked...
    let (_, sessions) = get(&app, "/auth/sessions", Some(access)).await;
    assert_eq!(sessions[0]["revoked"], true);

    // ...and the refresh token no longer rotates.
    let (status, response) =
        post_json(&app, "/auth/refresh", None, json!({ "refresh": refresh })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["detail"], "Session revoked or invalid");
}
