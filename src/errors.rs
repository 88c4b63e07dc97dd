//! Crate-wide error type.
//!
//! Every handler returns [`ApiResult`]; the single [`IntoResponse`] impl below
//! is the only place an error becomes an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::types::ErrorResponse;
use crate::storage::StorageError;

pub const MSG_NO_TOKEN: &str = "Not authorized, no token";
pub const MSG_NOT_AUTHORIZED: &str = "Not authorized";
pub const MSG_NOT_ADMIN: &str = "Not authorized as admin";
pub const MSG_EMAIL_EXISTS: &str = "User with this email already exists";
pub const MSG_SERVER_ERROR: &str = "Server error";

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", MSG_EMAIL_EXISTS)]
    EmailExists,

    /// The resource is still referenced and cannot be removed.
    #[error("{0}")]
    Conflict(String),

    #[error("{}", MSG_NO_TOKEN)]
    MissingToken,

    /// Bad token, or the token's account is gone or inactive.
    #[error("{}", MSG_NOT_AUTHORIZED)]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Route {0} not found")]
    RouteNotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn not_admin() -> Self {
        Self::Forbidden(MSG_NOT_ADMIN.to_string())
    }

    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(resource.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::EmailExists => StatusCode::BAD_REQUEST,

            Self::Conflict(_) => StatusCode::CONFLICT,

            Self::MissingToken
            | Self::Unauthorized
            | Self::InvalidCredentials
            | Self::AccountDeactivated => StatusCode::UNAUTHORIZED,

            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::NotFound(_) | Self::RouteNotFound(_) => StatusCode::NOT_FOUND,

            Self::Internal(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Internal detail stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Storage(_) => MSG_SERVER_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST; "validation")]
    #[test_case(ApiError::EmailExists, StatusCode::BAD_REQUEST; "duplicate email")]
    #[test_case(ApiError::Conflict("in use".into()), StatusCode::CONFLICT; "conflict")]
    #[test_case(ApiError::MissingToken, StatusCode::UNAUTHORIZED; "missing token")]
    #[test_case(ApiError::AccountDeactivated, StatusCode::UNAUTHORIZED; "deactivated")]
    #[test_case(ApiError::not_admin(), StatusCode::FORBIDDEN; "not admin")]
    #[test_case(ApiError::not_found("Booking"), StatusCode::NOT_FOUND; "not found")]
    #[test_case(ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR; "internal")]
    fn test_error_status_codes(err: ApiError, expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ApiError::MissingToken.client_message(), MSG_NO_TOKEN);
        assert_eq!(ApiError::Unauthorized.client_message(), MSG_NOT_AUTHORIZED);
        assert_eq!(ApiError::EmailExists.client_message(), MSG_EMAIL_EXISTS);
        assert_eq!(ApiError::not_admin().client_message(), MSG_NOT_ADMIN);
        assert_eq!(ApiError::not_found("Service").client_message(), "Service not found");
        assert_eq!(
            ApiError::RouteNotFound("/api/nope".into()).client_message(),
            "Route /api/nope not found"
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Storage(StorageError::Corrupt("bad json in preferences".into()));
        assert_eq!(err.client_message(), MSG_SERVER_ERROR);
        assert!(err.to_string().contains("bad json"));
    }
}
