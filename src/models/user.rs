//! Models that represent user accounts and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a user account.
pub struct User {
    /// Unique identifier for the user.
    pub id: Uuid,
    /// Email address used for login; unique across all accounts.
    pub email: String,
    /// Argon2 hash of the user's password.
    pub password_hash: String,
    /// Human-readable display name.
    pub name: String,
    /// Optional avatar URL.
    pub avatar: Option<String>,
    /// Inactive accounts cannot authenticate.
    pub is_active: bool,
    /// Creation timestamp for auditing.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp for auditing.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Constructs a new active user with a freshly generated identifier.
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            avatar: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating a new account.
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
    /// Optional label identifying the client/device.
    #[serde(default)]
    pub device_name: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Optional label identifying the client/device.
    #[serde(default)]
    pub device_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
/// Tokens returned after a successful registration.
pub struct RegisterResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
/// Tokens returned after a successful login.
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub session_id: Uuid,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
        }
    }
}
