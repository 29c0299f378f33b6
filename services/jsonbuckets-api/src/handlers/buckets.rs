//! Bucket lifecycle handlers.
//!
//! Each handler reads the authenticated identity from request extensions and
//! delegates to the bucket service; ownership and validation live below the
//! HTTP boundary.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use jsonbuckets_core::{BucketId, BucketSummary};

use crate::{error::ApiError, middleware::AuthenticatedUser, state::AppState};

/// Response for a successful bucket creation.
#[derive(Debug, Serialize)]
pub struct CreateBucketResponse {
    pub bucket_id: String,
    pub url: String,
}

/// Response for successful update and delete operations.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: &'static str,
    pub bucket_id: String,
}

/// A path id that is not a well-formed identifier cannot name any bucket;
/// reporting it as not-found keeps the response identical to a nonexistent id.
fn parse_bucket_id(raw: &str) -> Result<BucketId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// POST /bucket
pub async fn create_bucket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let bucket_id = state.buckets.create(user.0, &body).await?;
    info!(bucket_id = %bucket_id, "bucket created");

    Ok((
        StatusCode::CREATED,
        Json(CreateBucketResponse {
            bucket_id: bucket_id.to_string(),
            url: format!("/bucket/{bucket_id}"),
        }),
    ))
}

/// GET /buckets
pub async fn list_buckets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BucketSummary>>, ApiError> {
    let buckets = state.buckets.list(user.0).await?;
    Ok(Json(buckets))
}

/// GET /bucket/{id}
pub async fn view_bucket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(bucket_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let bucket_id = parse_bucket_id(&bucket_id)?;
    let content = state.buckets.view(bucket_id, user.0).await?;
    Ok(Json(content))
}

/// PUT /bucket/{id}
pub async fn update_bucket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(bucket_id): Path<String>,
    body: Bytes,
) -> Result<Json<MutationResponse>, ApiError> {
    let bucket_id = parse_bucket_id(&bucket_id)?;
    state.buckets.update(bucket_id, user.0, &body).await?;
    info!(bucket_id = %bucket_id, "bucket updated");

    Ok(Json(MutationResponse {
        message: "updated",
        bucket_id: bucket_id.to_string(),
    }))
}

/// DELETE /bucket/{id}
pub async fn delete_bucket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(bucket_id): Path<String>,
) -> Result<Json<MutationResponse>, ApiError> {
    let bucket_id = parse_bucket_id(&bucket_id)?;
    state.buckets.delete(bucket_id, user.0).await?;
    info!(bucket_id = %bucket_id, "bucket deleted");

    Ok(Json(MutationResponse {
        message: "deleted",
        bucket_id: bucket_id.to_string(),
    }))
}
