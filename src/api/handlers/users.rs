//! User administration and self-service profile handlers.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::server::AppState;
use crate::api::types::{DataResponse, ListResponse, MessageResponse};
use crate::api::validators::{validate_optional, Validate, ValidationResult};
use crate::auth::CurrentUser;
use crate::errors::{ApiError, ApiResult};
use crate::models::{Account, AccountChanges, Preferences};

/// Profile fields a user may change. Anything else in the body is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub preferences: Option<Preferences>,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> ValidationResult {
        validate_optional(self.first_name.as_deref(), "First name")?;
        validate_optional(self.last_name.as_deref(), "Last name")?;
        validate_optional(self.phone.as_deref(), "Phone")?;
        Ok(())
    }
}

impl From<UpdateUserRequest> for AccountChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name.map(|s| s.trim().to_string()),
            last_name: req.last_name.map(|s| s.trim().to_string()),
            phone: req.phone.map(|s| s.trim().to_string()),
            preferences: req.preferences,
        }
    }
}

/// GET /api/users (admin)
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Account>>> {
    let accounts = state.accounts.list().await?;
    Ok(Json(ListResponse::new(accounts)))
}

/// GET /api/users/:id (owner or admin)
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<Account>>> {
    user.ensure_owner_or_admin(id, "Not authorized to access this user")?;

    let account = state
        .accounts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(DataResponse::new(account)))
}

/// PUT /api/users/:id (owner or admin)
pub async fn update_user(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<MessageResponse<Account>>> {
    user.ensure_owner_or_admin(id, "Not authorized to update this user")?;

    let account = state
        .accounts
        .update(id, req.into())
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    info!(account_id = id, updated_by = user.id(), "profile updated");
    Ok(Json(MessageResponse::with_data("User updated successfully", account)))
}

/// DELETE /api/users/:id (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse<()>>> {
    if !state.accounts.delete(id).await? {
        return Err(ApiError::not_found("User"));
    }

    info!(account_id = id, deleted_by = user.id(), "account deleted");
    Ok(Json(MessageResponse::message("User deleted successfully")))
}
