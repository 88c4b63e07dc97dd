//! Password policy and bcrypt hashing.

use crate::auth::config::PasswordConfig;
use crate::errors::ApiError;

/// Password service
pub struct PasswordService {
    config: PasswordConfig,
}

impl PasswordService {
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Registration-time strength policy.
    pub fn validate_strength(&self, password: &str) -> Result<(), ApiError> {
        if password.chars().count() < self.config.min_length {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters",
                self.config.min_length
            )));
        }

        if self.config.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(ApiError::Validation(
                "Password must contain at least one digit".to_string(),
            ));
        }

        if self.config.require_letter && !password.chars().any(|c| c.is_alphabetic()) {
            return Err(ApiError::Validation(
                "Password must contain at least one letter".to_string(),
            ));
        }

        Ok(())
    }

    /// bcrypt with a fresh salt. CPU-bound, call from a blocking thread.
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        bcrypt::hash(password, self.config.bcrypt_cost)
            .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
    }

    /// `Ok(false)` on mismatch; a malformed stored hash is an internal error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        bcrypt::verify(password, hash)
            .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))
    }
}
