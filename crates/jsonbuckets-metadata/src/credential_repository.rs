//! SQLite implementation of the credential store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, Row, SqlitePool};

use jsonbuckets_core::{CoreError, CoreResult, CredentialStore, UserId, UserRecord};

/// SQLite-backed credential store.
///
/// The `api_key_hash` column carries a UNIQUE index, so `find_by_key_hash` is
/// a point query, never a scan.
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    /// Creates a new SQLite credential store.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create(&self, user: &UserRecord) -> CoreResult<()> {
        let user_id = user.user_id.to_bytes().to_vec();
        let created_at = user.created_at.to_rfc3339();

        query("INSERT INTO users (id, api_key_hash, created_at) VALUES (?1, ?2, ?3)")
            .bind(user_id)
            .bind(&user.api_key_hash)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CoreError::storage("api key already registered")
                } else {
                    CoreError::storage(e.to_string())
                }
            })?;

        Ok(())
    }

    async fn find_by_key_hash(&self, key_hash: &str) -> CoreResult<Option<UserId>> {
        let row = query("SELECT id FROM users WHERE api_key_hash = ?1")
            .bind(key_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::storage(e.to_string()))?;

        row.map(|r| {
            let id_bytes: Vec<u8> = r
                .try_get("id")
                .map_err(|e| CoreError::storage(format!("failed to get id: {e}")))?;
            UserId::from_bytes(&id_bytes)
                .map_err(|e| CoreError::storage(format!("invalid user id: {e}")))
        })
        .transpose()
    }
}

/// Parses an RFC 3339 timestamp column value.
pub(crate) fn parse_timestamp(value: &str, column: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::storage(format!("invalid {column}: {e}")))
}

/// Checks if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err.message().contains("UNIQUE constraint failed")
    } else {
        false
    }
}
