//! Bearer-token sessions.
//!
//! Identity travels as an explicit [`Session`] resolved from the
//! `Authorization` header on every protected route; nothing identity-related
//! is kept in ambient state.

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::directory::{UserId, UserRole};

/// Resolved caller identity for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub role: UserRole,
}

/// Lookup from bearer token to session.
pub trait SessionStore: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Session>;
}

/// Shared handle threaded through routers via `Extension`.
pub type Sessions = Arc<dyn SessionStore>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("insufficient role for this operation")]
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = value.strip_prefix("Bearer ").unwrap_or_default().trim();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(token)
}

/// Resolve the caller's session, failing when the header is absent or stale.
pub fn authenticate(headers: &HeaderMap, sessions: &dyn SessionStore) -> Result<Session, AuthError> {
    let token = bearer_token(headers)?;
    sessions.resolve(token).ok_or(AuthError::InvalidToken)
}

/// Like [`authenticate`], but an absent header is not an error. Invalid
/// tokens are still rejected so stale credentials never pass as anonymous.
pub fn optional_session(
    headers: &HeaderMap,
    sessions: &dyn SessionStore,
) -> Result<Option<Session>, AuthError> {
    match bearer_token(headers) {
        Ok(token) => sessions.resolve(token).map(Some).ok_or(AuthError::InvalidToken),
        Err(AuthError::MissingToken) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Gate an operation on the caller holding one of `roles`.
pub fn require_role(session: &Session, roles: &[UserRole]) -> Result<(), AuthError> {
    if roles.contains(&session.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
