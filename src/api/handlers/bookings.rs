//! Booking handlers.
//!
//! Customers manage their own bookings; administrators see and manage all of
//! them and are the only ones who may change `status`, `paymentStatus` or
//! `notes`.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::extract::{ApiJson, ApiPath};
use crate::api::server::AppState;
use crate::api::types::{DataResponse, ListResponse, MessageResponse};
use crate::api::validators::{
    flexible_date, nullable, validate_email, validate_long_text, validate_max_len, validate_optional,
    validate_required, Validate, ValidationResult,
};
use crate::auth::CurrentUser;
use crate::errors::{ApiError, ApiResult};
use crate::models::{BookingChanges, BookingDetails, BookingStatus, NewBooking, PaymentStatus};

const MAX_TIME_LEN: usize = 20;

fn validate_appointment_date(date: NaiveDate) -> ValidationResult {
    if date < Utc::now().date_naive() {
        return Err(ApiError::Validation(
            "Appointment date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

fn validate_appointment_time(time: &str) -> ValidationResult {
    validate_required(time, "Appointment time")?;
    validate_max_len(time, "Appointment time", MAX_TIME_LEN)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub service_id: i64,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub special_requests: Option<String>,
}

impl Validate for CreateBookingRequest {
    fn validate(&self) -> ValidationResult {
        validate_appointment_date(self.appointment_date)?;
        validate_appointment_time(&self.appointment_time)?;
        validate_required(&self.customer_name, "Customer name")?;
        validate_email(&self.customer_email)?;
        validate_required(&self.customer_phone, "Customer phone")?;
        validate_long_text(self.special_requests.as_deref(), "Special requests")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[serde(default, deserialize_with = "flexible_date::deserialize_option")]
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub special_requests: Option<Option<String>>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl Validate for UpdateBookingRequest {
    fn validate(&self) -> ValidationResult {
        self.appointment_date
            .map_or(Ok(()), validate_appointment_date)?;
        self.appointment_time
            .as_deref()
            .map_or(Ok(()), validate_appointment_time)?;
        validate_optional(self.customer_name.as_deref(), "Customer name")?;
        self.customer_email
            .as_deref()
            .map_or(Ok(()), validate_email)?;
        validate_optional(self.customer_phone.as_deref(), "Customer phone")?;
        validate_long_text(
            self.special_requests.as_ref().and_then(Option::as_deref),
            "Special requests",
        )?;
        validate_long_text(self.notes.as_ref().and_then(Option::as_deref), "Notes")
    }
}

impl From<UpdateBookingRequest> for BookingChanges {
    fn from(req: UpdateBookingRequest) -> Self {
        Self {
            appointment_date: req.appointment_date,
            appointment_time: req.appointment_time.map(|s| s.trim().to_string()),
            customer_name: req.customer_name.map(|s| s.trim().to_string()),
            customer_email: req.customer_email.map(|s| s.trim().to_string()),
            customer_phone: req.customer_phone.map(|s| s.trim().to_string()),
            special_requests: req.special_requests,
            status: req.status,
            payment_status: req.payment_status,
            notes: req.notes,
        }
    }
}

/// Load a booking the caller may act on.
async fn owned_booking(
    state: &AppState,
    user: &CurrentUser,
    id: i64,
    message: &str,
) -> ApiResult<BookingDetails> {
    let booking = state
        .bookings
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking"))?;
    user.ensure_owner_or_admin(booking.booking.user_id, message)?;
    Ok(booking)
}

/// GET /api/bookings (admin)
pub async fn list_bookings(State(state): State<AppState>) -> ApiResult<Json<ListResponse<BookingDetails>>> {
    let bookings = state.bookings.list_all().await?;
    Ok(Json(ListResponse::new(bookings)))
}

/// GET /api/bookings/my
pub async fn my_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ListResponse<BookingDetails>>> {
    let bookings = state.bookings.list_for_user(user.id()).await?;
    Ok(Json(ListResponse::new(bookings)))
}

/// GET /api/bookings/:id (owner or admin)
pub async fn get_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<DataResponse<BookingDetails>>> {
    let booking = owned_booking(&state, &user, id, "Not authorized to view this booking").await?;
    Ok(Json(DataResponse::new(booking)))
}

/// POST /api/bookings
///
/// The amount is taken from the service price at booking time.
pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse<BookingDetails>>)> {
    let service = state
        .services
        .find_by_id(req.service_id)
        .await?
        .filter(|s| s.is_active)
        .ok_or_else(|| ApiError::not_found("Service"))?;

    let booking = state
        .bookings
        .create(NewBooking {
            user_id: user.id(),
            service_id: service.id,
            appointment_date: req.appointment_date,
            appointment_time: req.appointment_time.trim().to_string(),
            customer_name: req.customer_name.trim().to_string(),
            customer_email: req.customer_email.trim().to_string(),
            customer_phone: req.customer_phone.trim().to_string(),
            special_requests: req.special_requests,
            total_amount: service.price,
        })
        .await?;

    info!(booking_id = booking.booking.id, account_id = user.id(), "appointment booked");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data("Booking created successfully", booking)),
    ))
}

/// PUT /api/bookings/:id (owner or admin)
pub async fn update_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateBookingRequest>,
) -> ApiResult<Json<MessageResponse<BookingDetails>>> {
    owned_booking(&state, &user, id, "Not authorized to update this booking").await?;

    let changes = BookingChanges::from(req);
    if changes.touches_admin_fields() && !user.is_admin() {
        warn!(booking_id = id, account_id = user.id(), "non-admin tried to change booking status");
        return Err(ApiError::Forbidden(
            "Only administrators can change booking status or notes".to_string(),
        ));
    }

    let booking = state
        .bookings
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking"))?;
    Ok(Json(MessageResponse::with_data("Booking updated successfully", booking)))
}

/// DELETE /api/bookings/:id (owner or admin)
pub async fn delete_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse<()>>> {
    owned_booking(&state, &user, id, "Not authorized to delete this booking").await?;

    if !state.bookings.delete(id).await? {
        return Err(ApiError::not_found("Booking"));
    }
    info!(booking_id = id, deleted_by = user.id(), "booking deleted");
    Ok(Json(MessageResponse::message("Booking deleted successfully")))
}
