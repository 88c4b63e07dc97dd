//! Auth route handlers.

use axum::{extract::State, http::StatusCode, Json};

use crate::api::extract::ApiJson;
use crate::api::server::AppState;
use crate::api::types::DataResponse;
use crate::auth::middleware::CurrentUser;
use crate::auth::types::{AuthResponse, LoginRequest, RegisterRequest};
use crate::errors::ApiResult;
use crate::models::Account;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.auth.register(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(
            "User registered successfully",
            session.account,
            session.token,
        )),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state.auth.login(req).await?;
    Ok(Json(AuthResponse::new(
        "Login successful",
        session.account,
        session.token,
    )))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(account): CurrentUser) -> Json<DataResponse<Account>> {
    Json(DataResponse::new(account))
}
