//! Auth-internal error kinds.
//!
//! These never reach the client as-is: [`TokenError`] collapses into
//! [`ApiError::MissingToken`] or [`ApiError::Unauthorized`].

use thiserror::Error;

use super::config::MIN_SECRET_LEN;
use crate::errors::ApiError;

/// Why a bearer token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("no token supplied")]
    Missing,

    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => ApiError::MissingToken,
            TokenError::Malformed | TokenError::Expired | TokenError::InvalidSignature => {
                ApiError::Unauthorized
            }
        }
    }
}

/// Rejected signing secret.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("JWT secret is empty")]
    Empty,

    #[error("JWT secret must be at least {MIN_SECRET_LEN} bytes, got {0}")]
    TooShort(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_token_errors_collapse() {
        assert!(matches!(ApiError::from(TokenError::Missing), ApiError::MissingToken));
        for kind in [TokenError::Malformed, TokenError::Expired, TokenError::InvalidSignature] {
            let err = ApiError::from(kind);
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.client_message(), "Not authorized");
        }
    }
}
