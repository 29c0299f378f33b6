//! API key authentication middleware.
//!
//! Resolves the bearer token to a user id with one indexed point query and
//! stores the identity in request extensions for the handlers. An absent
//! token is 401; a token matching no registered key is 403 (a preserved
//! compatibility quirk of this API).

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use jsonbuckets_core::{hash_api_key, CredentialStore, UserId};

use crate::error::ApiError;

/// The authenticated identity, injected into request extensions on success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

/// Extracts the bearer token from the authorization header.
///
/// A missing `Bearer ` prefix is tolerated and the whole value used as the
/// token; an empty remainder counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Authentication middleware.
pub async fn auth_middleware(
    credentials: Arc<dyn CredentialStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            warn!(path = %request.uri().path(), "missing API key");
            return ApiError::MissingCredential.into_response();
        }
    };

    // Keys are stored hashed; the lookup stays an exact match on an indexed
    // column and the plaintext never touches the database.
    match credentials.find_by_key_hash(&hash_api_key(&token)).await {
        Ok(Some(user_id)) => {
            debug!(user_id = %user_id, path = %request.uri().path(), "API key validated");
            request.extensions_mut().insert(AuthenticatedUser(user_id));
            next.run(request).await
        }
        Ok(None) => {
            warn!(path = %request.uri().path(), "unrecognized API key");
            ApiError::InvalidCredential.into_response()
        }
        Err(err) => ApiError::Internal(err).into_response(),
    }
}
