//! Bucket domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BucketId, UserId};

/// A bucket row as persisted: owned, opaque JSON content plus timestamps.
///
/// `content` holds the canonical serialized form of the client-supplied JSON
/// value; it is validated on the way in by the bucket service, never here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BucketRecord {
    /// Opaque unique identifier, immutable after creation.
    pub bucket_id: BucketId,

    /// Owning user, immutable after creation. Only this identity may observe
    /// the bucket's existence.
    pub owner_id: UserId,

    /// Serialized JSON content.
    pub content: String,

    /// Set once at insertion.
    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful update.
    pub updated_at: DateTime<Utc>,
}

impl BucketRecord {
    /// Creates a fresh record for insertion, stamping both timestamps with the
    /// same instant.
    #[must_use]
    pub fn new(owner_id: UserId, content: String) -> Self {
        let now = Utc::now();
        Self {
            bucket_id: BucketId::new(),
            owner_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing row: identifiers and timestamps only, never content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BucketSummary {
    /// Bucket identifier.
    pub id: BucketId,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}
