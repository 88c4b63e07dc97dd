//! Persistence layer.
//!
//! Handlers and services talk to the [`AccountStore`], [`ServiceStore`] and
//! [`BookingStore`] traits. [`SqliteStorage`] implements all three on one
//! `sqlx` pool.

pub mod errors;
pub mod sqlite;
pub mod r#trait;

pub use errors::StorageError;
pub use r#trait::{AccountStore, BookingStore, ServiceStore};
pub use sqlite::SqliteStorage;
