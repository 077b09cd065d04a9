use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → list of human-readable messages, serialized as the
/// response body of a 400 validation failure.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    /// Bad email/password pair, unknown account, or inactive account.
    /// One message for all causes so callers cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Refresh token that is malformed, expired, or denylisted.
    #[error("Invalid token")]
    InvalidToken,
    /// Structurally valid refresh token whose session is revoked or was
    /// never bound. Worded identically for both cases on purpose.
    #[error("Session revoked or invalid")]
    SessionInvalid,
    #[error("{0}")]
    NotFound(String),
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Single-field validation failure, e.g. a duplicate email.
    pub fn validation_field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
            other => {
                let status = match other {
                    AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
                    AppError::NotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::UNAUTHORIZED,
                };
                (status, Json(json!({ "detail": other.to_string() }))).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        AppError::Validation(fields)
    }
}
