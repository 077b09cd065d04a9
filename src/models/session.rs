//! Models for tracking device sessions bound to rotating refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Device label recorded when registration omits `device_name`.
pub const REGISTRATION_DEVICE_LABEL: &str = "Registration Device";
/// Device label recorded when login omits `device_name`.
pub const UNKNOWN_DEVICE_LABEL: &str = "Unknown Device";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of one device's standing authorization.
pub struct Session {
    /// Unique identifier; the external handle used for revocation.
    pub id: Uuid,
    /// Owning user; no cross-user visibility or mutation.
    pub user_id: Uuid,
    /// Free-form label supplied by the client at creation.
    pub device_label: String,
    /// Timestamp set once at creation.
    pub created_at: DateTime<Utc>,
    /// Updated on every successful rotation.
    pub last_seen: DateTime<Utc>,
    /// jti of the refresh token currently authorized to extend this
    /// session; swapped atomically at rotation.
    pub current_token_id: Option<String>,
    /// Monotonic false→true; a revoked session can never rotate again.
    pub revoked: bool,
}

impl Session {
    /// Constructs a live session bound to a freshly issued refresh jti.
    pub fn new(user_id: Uuid, device_label: String, refresh_jti: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            device_label,
            created_at: now,
            last_seen: now,
            current_token_id: Some(refresh_jti),
            revoked: false,
        }
    }
}

#[derive(Debug, Serialize)]
/// Public-facing representation of a session returned by the API.
pub struct SessionResponse {
    pub id: Uuid,
    pub device_name: String,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub revoked: bool,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        SessionResponse {
            id: session.id,
            device_name: session.device_label,
            created_at: session.created_at,
            last_seen: session.last_seen,
            revoked: session.revoked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_binds_the_refresh_jti_and_is_live() {
        let session = Session::new(Uuid::new_v4(), "Test Device".into(), "jti-1".into());
        assert_eq!(session.current_token_id.as_deref(), Some("jti-1"));
        assert!(!session.revoked);
        assert_eq!(session.created_at, session.last_seen);
    }

    #[test]
    fn session_response_exposes_device_name_key() {
        let session = Session::new(Uuid::new_v4(), "Chrome on macOS".into(), "jti-2".into());
        let json = serde_json::to_value(SessionResponse::from(session)).unwrap();
        assert_eq!(json["device_name"], "Chrome on macOS");
        assert_eq!(json["revoked"], false);
        assert!(json.get("current_token_id").is_none());
    }
}
