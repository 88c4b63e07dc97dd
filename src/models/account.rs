//! Account records.
//!
//! [`Account`] is the public view and is what handlers serialize. The bcrypt
//! hash only travels inside [`AccountRecord`], which is never serialized.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Loyalty tier shown on the member profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum MembershipStatus {
    #[default]
    Basic,
    Silver,
    Gold,
    Platinum,
}

/// Marketing preferences, stored as a JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "Preferences::default_newsletter")]
    pub newsletter: bool,
    #[serde(default)]
    pub sms_notifications: bool,
}

impl Preferences {
    fn default_newsletter() -> bool {
        true
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            newsletter: Self::default_newsletter(),
            sms_notifications: false,
        }
    }
}

/// An account as exposed over the API (no credential).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub member_since: DateTime<Utc>,
    pub points: i64,
    pub membership_status: MembershipStatus,
    pub is_admin: bool,
    #[sqlx(json)]
    pub preferences: Preferences,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account row including the password hash. Only the login path reads it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRecord {
    #[sqlx(flatten)]
    pub account: Account,
    pub password_hash: String,
}

/// Insert payload. `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub password_hash: String,
}

/// Self-service profile changes. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub preferences: Option<Preferences>,
}

/// Trim and lowercase an email so lookups and inserts agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
