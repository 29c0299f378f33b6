//! SQLite implementation of the bucket store.
//!
//! Every per-bucket statement matches on both id and owner, so a non-owner's
//! request is indistinguishable from the bucket not existing, and each
//! mutation is a single atomic row write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, Row, SqlitePool};

use jsonbuckets_core::{
    BucketId, BucketRecord, BucketStore, BucketSummary, CoreError, CoreResult, UserId,
};

use crate::credential_repository::parse_timestamp;

/// SQLite-backed bucket store.
pub struct SqliteBucketStore {
    pool: SqlitePool,
}

impl SqliteBucketStore {
    /// Creates a new SQLite bucket store.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BucketStore for SqliteBucketStore {
    async fn insert(&self, bucket: &BucketRecord) -> CoreResult<()> {
        let bucket_id = bucket.bucket_id.to_bytes().to_vec();
        let owner_id = bucket.owner_id.to_bytes().to_vec();
        let created_at = bucket.created_at.to_rfc3339();
        let updated_at = bucket.updated_at.to_rfc3339();

        query(
            "INSERT INTO buckets (id, owner_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(bucket_id)
        .bind(owner_id)
        .bind(&bucket.content)
        .bind(created_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| CoreError::storage(e.to_string()))?;

        Ok(())
    }

    async fn fetch_content(
        &self,
        bucket_id: BucketId,
        owner_id: UserId,
    ) -> CoreResult<Option<String>> {
        let row = query("SELECT content FROM buckets WHERE id = ?1 AND owner_id = ?2")
            .bind(bucket_id.to_bytes().to_vec())
            .bind(owner_id.to_bytes().to_vec())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| CoreError::storage(e.to_string()))?;

        row.map(|r| {
            r.try_get::<String, _>("content")
                .map_err(|e| CoreError::storage(format!("failed to get content: {e}")))
        })
        .transpose()
    }

    async fn update_content(
        &self,
        bucket_id: BucketId,
        owner_id: UserId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> CoreResult<bool> {
        let result = query(
            "UPDATE buckets SET content = ?1, updated_at = ?2
             WHERE id = ?3 AND owner_id = ?4",
        )
        .bind(content)
        .bind(updated_at.to_rfc3339())
        .bind(bucket_id.to_bytes().to_vec())
        .bind(owner_id.to_bytes().to_vec())
        .execute(&self.pool)
        .await
        .map_err(|e| CoreError::storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, bucket_id: BucketId, owner_id: UserId) -> CoreResult<bool> {
        let result = query("DELETE FROM buckets WHERE id = ?1 AND owner_id = ?2")
            .bind(bucket_id.to_bytes().to_vec())
            .bind(owner_id.to_bytes().to_vec())
            .execute(&self.pool)
            .await
            .map_err(|e| CoreError::storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner_id: UserId) -> CoreResult<Vec<BucketSummary>> {
        let rows = query(
            "SELECT id, created_at, updated_at FROM buckets
             WHERE owner_id = ?1 ORDER BY created_at ASC",
        )
        .bind(owner_id.to_bytes().to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::storage(e.to_string()))?;

        rows.iter().map(parse_summary_row).collect()
    }
}

/// Parses a SQLite row into a `BucketSummary`.
fn parse_summary_row(row: &sqlx::sqlite::SqliteRow) -> CoreResult<BucketSummary> {
    let id_bytes: Vec<u8> = row
        .try_get("id")
        .map_err(|e| CoreError::storage(format!("failed to get id: {e}")))?;
    let id = BucketId::from_bytes(&id_bytes)
        .map_err(|e| CoreError::storage(format!("invalid bucket id: {e}")))?;

    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| CoreError::storage(format!("failed to get created_at: {e}")))?;
    let updated_at: String = row
        .try_get("updated_at")
        .map_err(|e| CoreError::storage(format!("failed to get updated_at: {e}")))?;

    Ok(BucketSummary {
        id,
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}
