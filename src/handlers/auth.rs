use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    models::session::{REGISTRATION_DEVICE_LABEL, UNKNOWN_DEVICE_LABEL},
    models::user::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User, UserResponse,
    },
    state::AppState,
    utils::password::{hash_password, verify_password},
};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate()?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::validation_field(
            "email",
            "user with this email already exists.",
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .users
        .create(User::new(payload.email, password_hash, payload.name))
        .await?;

    let (_session, pair) = state
        .lifecycle
        .create_session(
            &user,
            payload.device_name.as_deref(),
            REGISTRATION_DEVICE_LABEL,
        )
        .await?;

    let response = RegisterResponse {
        access: pair.access,
        refresh: pair.refresh,
        user: UserResponse::from(user),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Unknown email, wrong password, and inactive account all fail with
    // the same response.
    let user = state
        .users
        .find_by_email(&payload.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }
    if !user.is_active {
        return Err(AppError::InvalidCredentials);
    }

    let (session, pair) = state
        .lifecycle
        .create_session(&user, payload.device_name.as_deref(), UNKNOWN_DEVICE_LABEL)
        .await?;

    Ok(Json(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        session_id: session.id,
        user: UserResponse::from(user),
    }))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let refresh_token = extract_refresh_field(&payload)?;
    let pair = state.lifecycle.rotate(refresh_token).await?;
    Ok(Json(json!({
        "access": pair.access,
        "refresh": pair.refresh,
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let refresh_token = extract_refresh_field(&payload)?;

    // Best effort from here on: the client discards its copy either way.
    state.lifecycle.end_current_session(refresh_token).await;

    Ok((
        StatusCode::RESET_CONTENT,
        Json(json!({ "detail": "Logged out successfully" })),
    ))
}

fn extract_refresh_field(payload: &Value) -> Result<&str, AppError> {
    payload
        .get("refresh")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing refresh token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_field_must_be_a_non_empty_string() {
        assert!(extract_refresh_field(&json!({})).is_err());
        assert!(extract_refresh_field(&json!({ "refresh": "" })).is_err());
        assert!(extract_refresh_field(&json!({ "refresh": 42 })).is_err());
        assert_eq!(
            extract_refresh_field(&json!({ "refresh": "tok" })).unwrap(),
            "tok"
        );
    }
}
