//! Domain records shared by the stores and the HTTP layer.

pub mod account;
pub mod booking;
pub mod service;

pub use account::{
    normalize_email, Account, AccountChanges, AccountRecord, MembershipStatus, NewAccount, Preferences,
};
pub use booking::{
    Booking, BookingChanges, BookingDetails, BookingStatus, NewBooking, PaymentStatus, UserSummary,
};
pub use service::{NewService, ServiceChanges, ServiceSummary, SpaService};
