//! In-memory store implementations for tests and local development.
//!
//! Sessions live in an insertion-ordered `Vec`, so listings come back in
//! creation order without needing an index. The rotation compare-and-set
//! runs under the write lock, giving the same lost-race semantics as the
//! Postgres `UPDATE ... WHERE current_token_id = $old`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::session::Session;
use crate::models::user::User;

use super::session::SessionStore;
use super::token_denylist::TokenDenylist;
use super::user::UserStore;

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<Vec<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: Session) -> anyhow::Result<Session> {
        let mut sessions = self.sessions.write().await;
        sessions.push(session.clone());
        Ok(session)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_refresh_jti(&self, jti: &str) -> anyhow::Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .find(|s| s.current_token_id.as_deref() == Some(jti))
            .cloned())
    }

    async fn rotate_refresh_jti(
        &self,
        current_jti: &str,
        new_jti: &str,
        last_seen: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions
            .iter_mut()
            .find(|s| s.current_token_id.as_deref() == Some(current_jti) && !s.revoked)
        else {
            return Ok(false);
        };
        session.current_token_id = Some(new_jti.to_string());
        session.last_seen = last_seen;
        Ok(true)
    }

    async fn revoke_owned(&self, session_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.user_id == user_id)
        else {
            return Ok(false);
        };
        session.revoked = true;
        Ok(true)
    }

    async fn revoke_by_refresh_jti(&self, jti: &str) -> anyhow::Result<bool> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions
            .iter_mut()
            .find(|s| s.current_token_id.as_deref() == Some(jti))
        else {
            return Ok(false);
        };
        session.revoked = true;
        Ok(true)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: User) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            anyhow::bail!("duplicate email: {}", user.email);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTokenDenylist {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl MemoryTokenDenylist {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenDenylist for MemoryTokenDenylist {
    async fn insert(&self, jti: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        let mut revoked = self.revoked.write().await;
        revoked.entry(jti.to_string()).or_insert(expires_at);
        Ok(())
    }

    async fn contains(&self, jti: &str) -> anyhow::Result<bool> {
        let revoked = self.revoked.read().await;
        Ok(revoked.contains_key(jti))
    }
}
