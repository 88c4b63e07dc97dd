//! Route handlers, one module per resource.

pub mod bookings;
pub mod health;
pub mod services;
pub mod users;
