//! Catalog entries (treatments offered by the spa).

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A bookable treatment.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpaService {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Minutes.
    pub duration: i64,
    #[sqlx(json)]
    pub features: Vec<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a service embedded in booking responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceSummary {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub duration: i64,
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: i64,
    pub features: Vec<String>,
    pub category: String,
    pub image_url: Option<String>,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration: Option<i64>,
    pub features: Option<Vec<String>>,
    pub category: Option<String>,
    /// `Some(None)` clears the image.
    pub image_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}
