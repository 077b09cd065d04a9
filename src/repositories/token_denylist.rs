//! Denylist of refresh token jtis that may no longer be presented.
//!
//! Populated at logout and after rotation. The session `revoked` flag is
//! the source of truth for revocation; this table is defense in depth.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::DbPool;

#[async_trait]
pub trait TokenDenylist: Send + Sync {
    /// Records `jti` as unusable until `expires_at`. Idempotent.
    async fn insert(&self, jti: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()>;

    async fn contains(&self, jti: &str) -> anyhow::Result<bool>;
}

pub struct PgTokenDenylist {
    pool: DbPool,
}

impl PgTokenDenylist {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenDenylist for PgTokenDenylist {
    async fn insert(&self, jti: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO revoked_tokens (jti, expires_at) VALUES ($1, $2) \
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn contains(&self, jti: &str) -> anyhow::Result<bool> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT jti FROM revoked_tokens WHERE jti = $1")
                .bind(jti)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }
}
