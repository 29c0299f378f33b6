//! Core domain types and contracts for the jsonbuckets document store.

pub mod auth;
pub mod bucket;
pub mod config;
pub mod error;
pub mod ids;
pub mod limiter;
pub mod traits;

pub use auth::{generate_api_key, hash_api_key, UserRecord};
pub use bucket::{BucketRecord, BucketSummary};
pub use config::{ApiConfig, DatabaseConfig, JsonbucketsConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{BucketId, UserId};
pub use limiter::{RateDenied, RateLimits, RateTracker, RouteClass};
pub use traits::{BucketStore, CredentialStore};
