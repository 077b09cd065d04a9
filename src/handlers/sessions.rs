use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::session::SessionResponse,
    models::user::User,
    state::AppState,
};

pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let sessions = state.lifecycle.list_sessions(user.id).await?;
    let responses = sessions.into_iter().map(SessionResponse::from).collect();
    Ok(Json(responses))
}

pub async fn revoke_session(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.lifecycle.revoke_session(user.id, session_id).await?;
    Ok(Json(json!({ "detail": "Session revoked" })))
}
