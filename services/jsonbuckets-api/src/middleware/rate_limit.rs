//! Per-origin rate limiting middleware.
//!
//! Runs after authentication (boundary order: authenticate, rate-limit,
//! dispatch) but keys counters by the client's network origin rather than the
//! authenticated user. GET routes count against the read window; POST, PUT,
//! and DELETE against the write window; every request counts against the
//! global day and hour windows.

use axum::{
    extract::{ConnectInfo, Request},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::warn;

use jsonbuckets_core::{RateTracker, RouteClass};

use crate::error::ApiError;

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    limiter: RateTracker,
    request: Request,
    next: Next,
) -> Response {
    let origin = client_origin(&request);
    let class = route_class(request.method());

    if let Err(denied) = limiter.check(&origin, class) {
        warn!(origin = %origin, quota = %denied.message, "rate limit exceeded");
        return ApiError::RateExceeded(denied).into_response();
    }

    next.run(request).await
}

fn route_class(method: &Method) -> RouteClass {
    if method == Method::GET {
        RouteClass::Read
    } else {
        RouteClass::Write
    }
}

/// Determines the client origin: peer address when the listener provides it,
/// falling back to the first `X-Forwarded-For` hop.
fn client_origin(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use jsonbuckets_core::RateLimits;
    use tower::ServiceExt;

    fn test_app(limits: RateLimits) -> Router {
        let limiter = RateTracker::new(limits);
        Router::new()
            .route("/item", post(|| async { "created" }))
            .route("/item", get(|| async { "fetched" }))
            .layer(middleware::from_fn(move |req, next| {
                let limiter = limiter.clone();
                rate_limit_middleware(limiter, req, next)
            }))
    }

    fn post_from(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/item")
            .header("X-Forwarded-For", origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn write_quota_denies_excess_requests() {
        let app = test_app(RateLimits {
            write_per_minute: 2,
            ..RateLimits::default()
        });

        for _ in 0..2 {
            let response = app.clone().oneshot(post_from("198.51.100.7")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(post_from("198.51.100.7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
    }

    #[tokio::test]
    async fn origins_do_not_share_windows() {
        let app = test_app(RateLimits {
            write_per_minute: 1,
            ..RateLimits::default()
        });

        let first = app.clone().oneshot(post_from("198.51.100.7")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let other = app.clone().oneshot(post_from("198.51.100.8")).await.unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn reads_count_against_the_read_window() {
        let app = test_app(RateLimits {
            write_per_minute: 1,
            read_per_minute: 3,
            ..RateLimits::default()
        });

        // Exhaust the write window; reads keep flowing.
        let _ = app.clone().oneshot(post_from("198.51.100.7")).await.unwrap();
        let denied = app.clone().oneshot(post_from("198.51.100.7")).await.unwrap();
        assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);

        let read = Request::builder()
            .uri("/item")
            .header("X-Forwarded-For", "198.51.100.7")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(read).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn forwarded_header_parsing_takes_first_hop() {
        let request = Request::builder()
            .uri("/item")
            .header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_origin(&request), "203.0.113.9");
    }

    #[test]
    fn missing_origin_falls_back_to_unknown() {
        let request = Request::builder().uri("/item").body(Body::empty()).unwrap();
        assert_eq!(client_origin(&request), "unknown");
    }
}
