//! HTTP handlers for the bucket REST endpoints.

pub mod buckets;

pub use buckets::{
    create_bucket, delete_bucket, list_buckets, update_bucket, view_bucket, CreateBucketResponse,
    MutationResponse,
};
