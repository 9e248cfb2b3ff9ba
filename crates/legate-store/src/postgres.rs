//! PostgreSQL-backed key-value store.
//!
//! Server-side deployments persist gating state as per-user rows so trial
//! timestamps, usage counters, and credit balances follow the user across
//! devices. The increment path is a single `INSERT ... ON CONFLICT ... DO
//! UPDATE ... RETURNING` statement, so concurrent requests from multiple
//! devices cannot lose updates.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::trace;
use uuid::Uuid;

use legate_core::{KeyValueStore, Result};

/// Schema for the gating key-value table.
///
/// Kept as a plain statement rather than a migration file because consumers
/// embed this crate into applications that manage schema themselves.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS gate_kv (
    user_id     UUID        NOT NULL,
    key         TEXT        NOT NULL,
    value       TEXT        NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (user_id, key)
)
"#;

/// Per-user PostgreSQL implementation of [`KeyValueStore`].
///
/// Each instance is scoped to one user; keys are namespaced by the
/// `(user_id, key)` primary key.
pub struct PgKeyValueStore {
    pool: Pool<Postgres>,
    user_id: Uuid,
}

impl PgKeyValueStore {
    /// Create a store scoped to `user_id` over an existing pool.
    pub fn new(pool: Pool<Postgres>, user_id: Uuid) -> Self {
        Self { pool, user_id }
    }

    /// Create the backing table if it does not exist.
    pub async fn ensure_schema(pool: &Pool<Postgres>) -> Result<()> {
        sqlx::query(SCHEMA_SQL).execute(pool).await?;
        Ok(())
    }

    /// The user this store is scoped to.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(
            subsystem = "store",
            component = "pg_kv",
            op = "get",
            store_key = key,
            "Reading key"
        );
        let row = sqlx::query("SELECT value FROM gate_kv WHERE user_id = $1 AND key = $2")
            .bind(self.user_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO gate_kv (user_id, key, value, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(self.user_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM gate_kv WHERE user_id = $1 AND key = $2")
            .bind(self.user_id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn increment(&self, key: &str, by: i64) -> Result<i64> {
        // Single-statement upsert: the addition happens inside the database,
        // so two devices incrementing the same counter both land.
        let row = sqlx::query(
            r#"
            INSERT INTO gate_kv (user_id, key, value, updated_at)
            VALUES ($1, $2, ($3::BIGINT)::TEXT, now())
            ON CONFLICT (user_id, key)
            DO UPDATE SET
                value = ((gate_kv.value)::BIGINT + $3)::TEXT,
                updated_at = now()
            RETURNING (value)::BIGINT AS count
            "#,
        )
        .bind(self.user_id)
        .bind(key)
        .bind(by)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        trace!(
            subsystem = "store",
            component = "pg_kv",
            op = "increment",
            store_key = key,
            count = count,
            "Counter incremented"
        );
        Ok(count)
    }
}

impl std::fmt::Debug for PgKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgKeyValueStore")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_composite_primary_key() {
        assert!(SCHEMA_SQL.contains("PRIMARY KEY (user_id, key)"));
        assert!(SCHEMA_SQL.contains("IF NOT EXISTS"));
    }
}
