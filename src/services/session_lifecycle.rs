//! The session lifecycle: creation, rotation, and revocation of the
//! binding between a refresh token and its session record.
//!
//! Revocation is checked against the session row first and the token
//! denylist second; the `revoked` flag is the source of truth, the
//! denylist exists so that a logged-out token dies even if its session
//! row were ever lost.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::session::Session;
use crate::models::user::User;
use crate::repositories::{SessionStore, TokenDenylist};
use crate::utils::jwt::{TokenIssuer, TokenPair};

#[derive(Clone)]
pub struct SessionLifecycle {
    sessions: Arc<dyn SessionStore>,
    denylist: Arc<dyn TokenDenylist>,
    issuer: TokenIssuer,
}

impl SessionLifecycle {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        denylist: Arc<dyn TokenDenylist>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            sessions,
            denylist,
            issuer,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Issues a token pair for `user` and persists a session bound to
    /// the pair's refresh jti. `default_label` fills in when the client
    /// sent no device name.
    pub async fn create_session(
        &self,
        user: &User,
        device_label: Option<&str>,
        default_label: &str,
    ) -> Result<(Session, TokenPair), AppError> {
        let pair = self.issuer.issue_pair(user.id)?;
        let label = device_label.unwrap_or(default_label).to_string();
        let session = self
            .sessions
            .create(Session::new(user.id, label, pair.refresh_jti.clone()))
            .await?;
        Ok((session, pair))
    }

    /// Exchanges a valid refresh token for a new pair, rebinding the
    /// session to the new refresh jti.
    ///
    /// The session binding is checked before the denylist: a token whose
    /// session is gone or revoked reads as `SessionInvalid` regardless
    /// of its own standing, and "revoked" is indistinguishable from
    /// "never existed".
    pub async fn rotate(&self, presented_refresh: &str) -> Result<TokenPair, AppError> {
        let claims = self
            .issuer
            .decode_refresh(presented_refresh)
            .map_err(|_| AppError::InvalidToken)?;

        let session = self
            .sessions
            .find_by_refresh_jti(&claims.jti)
            .await?
            .ok_or(AppError::SessionInvalid)?;
        if session.revoked {
            return Err(AppError::SessionInvalid);
        }

        if self.denylist.contains(&claims.jti).await? {
            return Err(AppError::InvalidToken);
        }

        let pair = self.issuer.issue_pair(session.user_id)?;

        // Compare-and-set keeps concurrent rotations of the same token
        // from both succeeding; the loser observes a moved binding.
        let rotated = self
            .sessions
            .rotate_refresh_jti(&claims.jti, &pair.refresh_jti, Utc::now())
            .await?;
        if !rotated {
            return Err(AppError::SessionInvalid);
        }

        self.denylist.insert(&claims.jti, claims.expires_at()).await?;

        Ok(pair)
    }

    /// Revokes one session by id, enforcing ownership. A session owned
    /// by someone else reads the same as an absent one. The denylist is
    /// deliberately untouched here: the caller may not hold the
    /// session's token, and rotation re-checks `revoked` anyway.
    pub async fn revoke_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<(), AppError> {
        let revoked = self.sessions.revoke_owned(session_id, user_id).await?;
        if !revoked {
            return Err(AppError::NotFound("Session not found".to_string()));
        }
        Ok(())
    }

    /// Best-effort logout: revokes the session bound to the presented
    /// refresh token and denylists its jti. Never fails: the client has
    /// already discarded the token, so every internal error is logged
    /// and swallowed.
    pub async fn end_current_session(&self, presented_refresh: &str) {
        let claims = match self.issuer.decode_refresh(presented_refresh) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(error = %err, "Logout with unparseable refresh token");
                return;
            }
        };

        if let Err(err) = self.sessions.revoke_by_refresh_jti(&claims.jti).await {
            tracing::warn!(error = %err, jti = %claims.jti, "Failed to revoke session at logout");
        }
        if let Err(err) = self.denylist.insert(&claims.jti, claims.expires_at()).await {
            tracing::warn!(error = %err, jti = %claims.jti, "Failed to denylist token at logout");
        }
    }

    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        Ok(self.sessions.list_for_user(user_id).await?)
    }
}
