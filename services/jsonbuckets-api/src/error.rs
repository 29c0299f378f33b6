//! Boundary mapping from the core error taxonomy to HTTP responses.
//!
//! Internal error detail is logged but never rendered into a response body;
//! clients always receive the category plus a short sanitized message.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use jsonbuckets_core::{CoreError, RateDenied};

/// Error body shape for all non-2xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// API-level error, one variant per response category.
#[derive(Debug)]
pub enum ApiError {
    /// No credential supplied (401).
    MissingCredential,
    /// Credential does not match any registered key (403, preserved quirk).
    InvalidCredential,
    /// Absent or invalid JSON body (400).
    InvalidInput(String),
    /// Missing or not-owned resource, indistinguishable (404).
    NotFound,
    /// A quota window ceiling was reached (429).
    RateExceeded(RateDenied),
    /// Internal fault; detail stays in the logs (500).
    Internal(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingCredential => Self::MissingCredential,
            CoreError::InvalidCredential => Self::InvalidCredential,
            CoreError::InvalidInput { message } => Self::InvalidInput(message),
            CoreError::NotFound { .. } => Self::NotFound,
            CoreError::RateExceeded { message } => Self::RateExceeded(RateDenied {
                message,
                retry_after: std::time::Duration::ZERO,
            }),
            err @ (CoreError::Storage(_) | CoreError::MalformedStorage(_)) => Self::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, category, message, retry_after) = match self {
            Self::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "No API key provided".to_string(),
                None,
            ),
            Self::InvalidCredential => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                "Invalid API key".to_string(),
                None,
            ),
            Self::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, "Bad Request", message, None)
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The requested resource was not found".to_string(),
                None,
            ),
            Self::RateExceeded(denied) => (
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded",
                denied.message,
                Some(denied.retry_after.as_secs().max(1)),
            ),
            Self::Internal(err) => {
                error!(error = %err, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            error: category.to_string(),
            message,
        });
        let mut response = (status, body).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = secs.to_string().parse() {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
