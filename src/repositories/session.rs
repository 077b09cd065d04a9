//! Session persistence: the durable table binding refresh jtis to
//! session records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::session::Session;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persists a newly created session.
    async fn create(&self, session: Session) -> anyhow::Result<Session>;

    /// All sessions owned by `user_id`, revoked ones included, in
    /// creation order. Rows are never deleted; they remain as an audit
    /// trail.
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Session>>;

    /// The session currently bound to `jti`, if any.
    async fn find_by_refresh_jti(&self, jti: &str) -> anyhow::Result<Option<Session>>;

    /// Compare-and-set rotation: rebinds the session from `current_jti`
    /// to `new_jti` and bumps `last_seen`, succeeding only if a
    /// non-revoked session still holds `current_jti`. Returns `false`
    /// when the binding moved or the session was revoked in the
    /// meantime; the caller must treat that as a lost race.
    async fn rotate_refresh_jti(
        &self,
        current_jti: &str,
        new_jti: &str,
        last_seen: DateTime<Utc>,
    ) -> anyhow::Result<bool>;

    /// Marks the session revoked iff it exists and belongs to
    /// `user_id`. An ownership mismatch reads the same as an absent row.
    async fn revoke_owned(&self, session_id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;

    /// Marks the session bound to `jti` revoked, if there is one.
    async fn revoke_by_refresh_jti(&self, jti: &str) -> anyhow::Result<bool>;
}

pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: Session) -> anyhow::Result<Session> {
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions
                (id, user_id, device_label, created_at, last_seen, current_token_id, revoked)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, device_label, created_at, last_seen, current_token_id, revoked
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.device_label)
        .bind(session.created_at)
        .bind(session.last_seen)
        .bind(&session.current_token_id)
        .bind(session.revoked)
        .fetch_one(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, device_label, created_at, last_seen, current_token_id, revoked
            FROM sessions
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_refresh_jti(&self, jti: &str) -> anyhow::Result<Option<Session>> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, device_label, created_at, last_seen, current_token_id, revoked
            FROM sessions
            WHERE current_token_id = $1
            "#,
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn rotate_refresh_jti(
        &self,
        current_jti: &str,
        new_jti: &str,
        last_seen: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET current_token_id = $1, last_seen = $2
            WHERE current_token_id = $3 AND revoked = FALSE
            "#,
        )
        .bind(new_jti)
        .bind(last_seen)
        .bind(current_jti)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_owned(&self, session_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result =
            sqlx::query("UPDATE sessions SET revoked = TRUE WHERE id = $1 AND user_id = $2")
                .bind(session_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_by_refresh_jti(&self, jti: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE sessions SET revoked = TRUE WHERE current_token_id = $1")
            .bind(jti)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
