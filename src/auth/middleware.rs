//! Authentication middleware and admin gate.
//!
//! ```text
//! request → require_auth → require_admin (admin routes) → handler
//! ```
//!
//! `require_auth` verifies the bearer token, re-resolves the account and
//! stores it as [`CurrentUser`] in the request extensions. `require_admin`
//! only reads that extension.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::api::server::AppState;
use crate::errors::ApiError;
use crate::models::Account;

/// The authenticated account behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Account);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin
    }

    /// Owner of the resource, or an administrator.
    pub fn ensure_owner_or_admin(&self, owner_id: i64, message: &str) -> Result<(), ApiError> {
        if self.is_admin() || self.id() == owner_id {
            Ok(())
        } else {
            warn!(account_id = self.id(), owner_id, "ownership check failed");
            Err(ApiError::Forbidden(message.to_string()))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// Token from `Authorization: Bearer <token>`, if the header uses that scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject requests without a valid token for a live account.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        warn!(path = %req.uri().path(), "request without bearer token");
        return Err(ApiError::MissingToken);
    };

    let account = state.auth.authenticate(token).await?;
    req.extensions_mut().insert(CurrentUser(account));
    Ok(next.run(req).await)
}

/// Reject non-administrators. Must run after [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = match req.extensions().get::<CurrentUser>() {
        Some(user) => user.is_admin(),
        None => return Err(ApiError::Unauthorized),
    };

    if !is_admin {
        warn!(path = %req.uri().path(), "admin route refused");
        return Err(ApiError::not_admin());
    }
    Ok(next.run(req).await)
}
