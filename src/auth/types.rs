//! Auth request and response bodies.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validators::{flexible_date, validate_email, validate_required, Validate, ValidationResult};
use crate::errors::ApiError;
use crate::models::Account;

/// Registration request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(deserialize_with = "flexible_date::deserialize")]
    pub birth_date: NaiveDate,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ValidationResult {
        validate_required(&self.first_name, "First name")?;
        validate_required(&self.last_name, "Last name")?;
        validate_email(&self.email)?;
        validate_required(&self.phone, "Phone")?;
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password is required".to_string()));
        }
        if self.birth_date > Utc::now().date_naive() {
            return Err(ApiError::Validation(
                "Birth date cannot be in the future".to_string(),
            ));
        }
        Ok(())
    }
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> ValidationResult {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "Please provide email and password".to_string(),
            ));
        }
        Ok(())
    }
}

/// Register/login response: `{success, message, user, token}`.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: Account,
    pub token: String,
}

impl AuthResponse {
    pub fn new(message: impl Into<String>, user: Account, token: String) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
            token,
        }
    }
}
