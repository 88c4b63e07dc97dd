//! Appointments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::service::ServiceSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// A booking row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of an account embedded in booking responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A booking joined with its service and owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub service: ServiceSummary,
    pub user: UserSummary,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub service_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub special_requests: Option<String>,
    pub total_amount: f64,
}

/// Partial update. The handler decides which fields a caller may set.
///
/// For nullable columns `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub special_requests: Option<Option<String>>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<Option<String>>,
}

impl BookingChanges {
    /// True when the change set touches fields reserved for administrators.
    pub fn touches_admin_fields(&self) -> bool {
        self.status.is_some() || self.payment_status.is_some() || self.notes.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_fields_detection() {
        let customer = BookingChanges {
            appointment_time: Some("14:00".into()),
            ..Default::default()
        };
        assert!(!customer.touches_admin_fields());

        let admin = BookingChanges {
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        };
        assert!(admin.touches_admin_fields());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(BookingStatus::Cancelled).unwrap(), "Cancelled");
        let parsed: PaymentStatus = serde_json::from_str("\"Refunded\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Refunded);
        assert!(serde_json::from_str::<BookingStatus>("\"Lost\"").is_err());
    }
}
