//! Service catalog handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::server::AppState;
use crate::api::types::{DataResponse, ListResponse, MessageResponse};
use crate::api::validators::{
    nullable, validate_long_text, validate_optional, validate_required, Validate, ValidationResult,
};
use crate::auth::CurrentUser;
use crate::errors::{ApiError, ApiResult};
use crate::models::{NewService, ServiceChanges, SpaService};
use crate::storage::StorageError;

const MAX_FEATURES: usize = 50;
const MAX_DURATION_MINUTES: i64 = 24 * 60;

fn validate_price(price: f64) -> ValidationResult {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::Validation(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

fn validate_duration(duration: i64) -> ValidationResult {
    if !(1..=MAX_DURATION_MINUTES).contains(&duration) {
        return Err(ApiError::Validation(format!(
            "Duration must be between 1 and {MAX_DURATION_MINUTES} minutes"
        )));
    }
    Ok(())
}

fn validate_features(features: &[String]) -> ValidationResult {
    if features.len() > MAX_FEATURES {
        return Err(ApiError::Validation(format!(
            "At most {MAX_FEATURES} features are allowed"
        )));
    }
    features
        .iter()
        .try_for_each(|feature| validate_required(feature, "Feature"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: i64,
    #[serde(default)]
    pub features: Vec<String>,
    pub category: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

impl Validate for CreateServiceRequest {
    fn validate(&self) -> ValidationResult {
        validate_required(&self.title, "Title")?;
        if self.description.trim().is_empty() {
            return Err(ApiError::Validation("Description is required".to_string()));
        }
        validate_long_text(Some(&self.description), "Description")?;
        validate_price(self.price)?;
        validate_duration(self.duration)?;
        validate_features(&self.features)?;
        validate_required(&self.category, "Category")?;
        validate_long_text(self.image_url.as_deref(), "Image URL")
    }
}

impl From<CreateServiceRequest> for NewService {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            price: req.price,
            duration: req.duration,
            features: req.features.into_iter().map(|f| f.trim().to_string()).collect(),
            category: req.category.trim().to_string(),
            image_url: req.image_url,
            sort_order: req.sort_order,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i64>,
    pub features: Option<Vec<String>>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

impl Validate for UpdateServiceRequest {
    fn validate(&self) -> ValidationResult {
        validate_optional(self.title.as_deref(), "Title")?;
        if self.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(ApiError::Validation("Description is required".to_string()));
        }
        validate_long_text(self.description.as_deref(), "Description")?;
        self.price.map_or(Ok(()), validate_price)?;
        self.duration.map_or(Ok(()), validate_duration)?;
        self.features
            .as_deref()
            .map_or(Ok(()), validate_features)?;
        validate_optional(self.category.as_deref(), "Category")?;
        validate_long_text(self.image_url.as_ref().and_then(Option::as_deref), "Image URL")
    }
}

impl From<UpdateServiceRequest> for ServiceChanges {
    fn from(req: UpdateServiceRequest) -> Self {
        Self {
            title: req.title.map(|s| s.trim().to_string()),
            description: req.description.map(|s| s.trim().to_string()),
            price: req.price,
            duration: req.duration,
            features: req
                .features
                .map(|fs| fs.into_iter().map(|f| f.trim().to_string()).collect()),
            category: req.category.map(|s| s.trim().to_string()),
            image_url: req.image_url,
            is_active: req.is_active,
            sort_order: req.sort_order,
        }
    }
}

/// GET /api/services
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<ListResponse<SpaService>>> {
    let services = state.services.list_active().await?;
    Ok(Json(ListResponse::new(services)))
}

/// GET /api/services/:id
///
/// Inactive services are hidden from the public catalog.
pub async fn get_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<SpaService>>> {
    let service = state
        .services
        .find_by_id(id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| ApiError::not_found("Service"))?;
    Ok(Json(DataResponse::new(service)))
}

/// POST /api/services (admin)
pub async fn create_service(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CreateServiceRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse<SpaService>>)> {
    let service = state.services.create(req.into()).await?;
    info!(service_id = service.id, created_by = user.id(), "catalog entry added");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data("Service created successfully", service)),
    ))
}

/// PUT /api/services/:id (admin)
pub async fn update_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateServiceRequest>,
) -> ApiResult<Json<MessageResponse<SpaService>>> {
    let service = state
        .services
        .update(id, req.into())
        .await?
        .ok_or_else(|| ApiError::not_found("Service"))?;
    Ok(Json(MessageResponse::with_data("Service updated successfully", service)))
}

/// DELETE /api/services/:id (admin)
pub async fn delete_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse<()>>> {
    match state.services.delete(id).await {
        Ok(true) => {
            info!(service_id = id, "catalog entry removed");
            Ok(Json(MessageResponse::message("Service deleted successfully")))
        }
        Ok(false) => Err(ApiError::not_found("Service")),
        Err(StorageError::ForeignKeyViolation) => Err(ApiError::Conflict(
            "Service has existing bookings and cannot be deleted".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_body() -> serde_json::Value {
        json!({
            "title": "Hot Stone Massage",
            "description": "Ninety minutes of heated basalt.",
            "price": 120.0,
            "duration": 90,
            "category": "Massage"
        })
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateServiceRequest = serde_json::from_value(create_body()).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.features.is_empty());
        assert_eq!(req.sort_order, 0);
    }

    #[test]
    fn test_create_request_rejects_bad_numbers() {
        let mut body = create_body();
        body["price"] = json!(-5);
        let req: CreateServiceRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());

        let mut body = create_body();
        body["duration"] = json!(0);
        let req: CreateServiceRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_partial() {
        let req: UpdateServiceRequest =
            serde_json::from_value(json!({"isActive": false, "price": 99.5})).unwrap();
        assert!(req.validate().is_ok());
        let changes = ServiceChanges::from(req);
        assert_eq!(changes.is_active, Some(false));
        assert!(changes.title.is_none());

        let req: UpdateServiceRequest = serde_json::from_value(json!({"title": "  "})).unwrap();
        assert!(req.validate().is_err());
    }
}
