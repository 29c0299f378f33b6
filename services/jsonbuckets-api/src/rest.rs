//! Router construction: the explicit middleware chain around the bucket
//! endpoints.
//!
//! Request flow is trace, then authenticate, then rate-limit, then dispatch;
//! each stage can short-circuit with a terminal response. `/health` sits
//! outside the chain.

use crate::{
    error::ApiError,
    handlers::{create_bucket, delete_bucket, list_buckets, update_bucket, view_bucket},
    middleware::{auth_middleware, rate_limit_middleware},
    state::AppState,
};
use axum::{
    extract::Request,
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Builds the Axum router hosting the bucket API.
pub fn build_router(state: AppState) -> Router {
    let credentials = state.credentials.clone();
    let limiter = state.limiter.clone();

    let protected = Router::new()
        .route("/bucket", post(create_bucket).fallback(unmatched))
        .route("/buckets", get(list_buckets).fallback(unmatched))
        .route(
            "/bucket/:bucket_id",
            get(view_bucket)
                .put(update_bucket)
                .delete(delete_bucket)
                .fallback(unmatched),
        )
        // Layers run outermost-last: auth first, then rate limiting.
        .layer(middleware::from_fn(move |req, next| {
            let limiter = limiter.clone();
            rate_limit_middleware(limiter, req, next)
        }))
        .layer(middleware::from_fn(move |req, next| {
            let credentials = credentials.clone();
            auth_middleware(credentials, req, next)
        }));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .fallback(unmatched)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let request_id = Uuid::new_v4();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_response(|response: &Response, latency: std::time::Duration, _span: &Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    if status.is_server_error() {
                        tracing::error!(status = %status, latency_ms = latency_ms, "request failed with server error");
                    } else if status.is_client_error() {
                        tracing::warn!(status = %status, latency_ms = latency_ms, "request failed with client error");
                    } else {
                        tracing::info!(status = %status, latency_ms = latency_ms, "request completed");
                    }
                })
                .on_failure(|failure_class: ServerErrorsFailureClass, latency: std::time::Duration, _span: &Span| {
                    tracing::error!(failure_class = ?failure_class, latency_ms = latency.as_millis(), "request failed");
                }),
        )
}

async fn health_check() -> &'static str {
    "ok"
}

/// Undefined routes and unsupported methods get the same serialized error
/// body as every other failure, instead of the framework's empty response.
async fn unmatched() -> ApiError {
    ApiError::NotFound
}
