use async_trait::async_trait;

use chrono::{DateTime, Utc};

use crate::auth::UserRecord;
use crate::bucket::{BucketRecord, BucketSummary};
use crate::error::CoreResult;
use crate::ids::{BucketId, UserId};

/// Persistence seam for user credentials.
///
/// Lookup is by key hash and must be a point query on an indexed column; it
/// runs on every protected request.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Registers a new user. Used by the keygen utility and tests; the
    /// request path never writes credentials.
    async fn create(&self, user: &UserRecord) -> CoreResult<()>;

    /// Resolves an API key hash to the owning user, if any.
    async fn find_by_key_hash(&self, key_hash: &str) -> CoreResult<Option<UserId>>;
}

/// Persistence seam for bucket documents.
///
/// Every per-bucket operation matches on both id and owner in a single
/// conditional statement, so "does not exist" and "not yours" are one and the
/// same observable outcome, and mutations are atomic at the row level.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Durably inserts a new bucket row.
    async fn insert(&self, bucket: &BucketRecord) -> CoreResult<()>;

    /// Fetches the serialized content of a bucket owned by `owner_id`.
    async fn fetch_content(
        &self,
        bucket_id: BucketId,
        owner_id: UserId,
    ) -> CoreResult<Option<String>>;

    /// Replaces content and `updated_at` in one conditional statement.
    /// Returns `false` when no row matched.
    async fn update_content(
        &self,
        bucket_id: BucketId,
        owner_id: UserId,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> CoreResult<bool>;

    /// Conditionally deletes a bucket. Returns `false` when no row matched.
    async fn delete(&self, bucket_id: BucketId, owner_id: UserId) -> CoreResult<bool>;

    /// Lists the owner's buckets ordered by ascending creation time, without
    /// content.
    async fn list_by_owner(&self, owner_id: UserId) -> CoreResult<Vec<BucketSummary>>;
}
