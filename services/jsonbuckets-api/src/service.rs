//! Bucket lifecycle operations.
//!
//! All five operations take the authenticated owner id and enforce ownership
//! through the store's conditional statements; the service never does
//! read-modify-write in two steps.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use jsonbuckets_core::{
    BucketId, BucketRecord, BucketStore, BucketSummary, CoreError, CoreResult, UserId,
};

/// Implements create, list, view, update, and delete over a bucket store.
#[derive(Clone)]
pub struct BucketService {
    store: Arc<dyn BucketStore>,
}

impl BucketService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn BucketStore>) -> Self {
        Self { store }
    }

    /// Validates a request body and returns its canonical serialized form.
    fn canonicalize(body: &[u8]) -> CoreResult<String> {
        if body.is_empty() {
            return Err(CoreError::invalid_input("No JSON content provided"));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| CoreError::invalid_input(format!("Request body is not valid JSON: {e}")))?;
        serde_json::to_string(&value).map_err(|e| CoreError::storage(e.to_string()))
    }

    /// Persists a new bucket for `owner_id` and returns its fresh id.
    pub async fn create(&self, owner_id: UserId, body: &[u8]) -> CoreResult<BucketId> {
        let content = Self::canonicalize(body)?;
        let record = BucketRecord::new(owner_id, content);
        self.store.insert(&record).await?;
        debug!(bucket_id = %record.bucket_id, owner_id = %owner_id, "bucket created");
        Ok(record.bucket_id)
    }

    /// Lists the owner's buckets, oldest first, without content.
    pub async fn list(&self, owner_id: UserId) -> CoreResult<Vec<BucketSummary>> {
        self.store.list_by_owner(owner_id).await
    }

    /// Returns the deserialized content of an owned bucket.
    pub async fn view(&self, bucket_id: BucketId, owner_id: UserId) -> CoreResult<Value> {
        let content = self
            .store
            .fetch_content(bucket_id, owner_id)
            .await?
            .ok_or_else(|| CoreError::not_found("bucket", bucket_id.to_string()))?;
        serde_json::from_str(&content).map_err(|e| CoreError::MalformedStorage(e.to_string()))
    }

    /// Replaces the content of an owned bucket, refreshing `updated_at`.
    pub async fn update(&self, bucket_id: BucketId, owner_id: UserId, body: &[u8]) -> CoreResult<()> {
        let content = Self::canonicalize(body)?;
        let matched = self
            .store
            .update_content(bucket_id, owner_id, &content, Utc::now())
            .await?;
        if !matched {
            return Err(CoreError::not_found("bucket", bucket_id.to_string()));
        }
        debug!(bucket_id = %bucket_id, owner_id = %owner_id, "bucket updated");
        Ok(())
    }

    /// Deletes an owned bucket.
    pub async fn delete(&self, bucket_id: BucketId, owner_id: UserId) -> CoreResult<()> {
        let matched = self.store.delete(bucket_id, owner_id).await?;
        if !matched {
            return Err(CoreError::not_found("bucket", bucket_id.to_string()));
        }
        debug!(bucket_id = %bucket_id, owner_id = %owner_id, "bucket deleted");
        Ok(())
    }
}
