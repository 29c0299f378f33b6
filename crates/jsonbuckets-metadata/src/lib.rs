//! SQLite persistence adapters for the jsonbuckets control plane.

mod bucket_repository;
mod credential_repository;
mod util;

pub use bucket_repository::SqliteBucketStore;
pub use credential_repository::SqliteCredentialStore;
pub use util::{create_sqlite_pool, run_migrations};

/// Embedded SQL migrations for the bucket database.
pub const MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
