//! Shared state for the API server.
//!
//! Constructed once at startup and handed to each component; business logic
//! never reaches for ambient globals.

use std::sync::Arc;

use jsonbuckets_core::{BucketStore, CredentialStore, RateLimits, RateTracker};

use crate::service::BucketService;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
    /// Credential store consulted by the authentication middleware.
    pub credentials: Arc<dyn CredentialStore>,
    /// Bucket lifecycle operations.
    pub buckets: BucketService,
    /// Per-origin request rate tracker.
    pub limiter: RateTracker,
}

impl AppState {
    /// Creates application state over the given stores and rate ceilings.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        bucket_store: Arc<dyn BucketStore>,
        limits: RateLimits,
    ) -> Self {
        Self {
            credentials,
            buckets: BucketService::new(bucket_store),
            limiter: RateTracker::new(limits),
        }
    }
}
