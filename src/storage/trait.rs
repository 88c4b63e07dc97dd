//! Store traits.
//!
//! "Not found" is `Ok(None)` (or `Ok(false)` for deletes), never an error.

use async_trait::async_trait;

use super::StorageError;
use crate::models::{
    Account, AccountChanges, AccountRecord, BookingChanges, BookingDetails, NewAccount,
    NewBooking, NewService, ServiceChanges, SpaService,
};

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up by normalized email, including the password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StorageError>;

    /// Insert with default profile values. A duplicate email yields
    /// [`StorageError::UniqueViolation`].
    async fn create(&self, account: NewAccount) -> Result<Account, StorageError>;

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<Option<Account>, StorageError>;

    /// Privileged flags, only reachable from the provisioning CLI.
    async fn set_flags(
        &self,
        email: &str,
        is_admin: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<Option<Account>, StorageError>;

    /// Deletes the account and, by cascade, its bookings.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    async fn list(&self) -> Result<Vec<Account>, StorageError>;

    async fn count(&self) -> Result<i64, StorageError>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    /// Active services ordered by `sort_order`.
    async fn list_active(&self) -> Result<Vec<SpaService>, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<SpaService>, StorageError>;

    async fn create(&self, service: NewService) -> Result<SpaService, StorageError>;

    async fn update(&self, id: i64, changes: ServiceChanges) -> Result<Option<SpaService>, StorageError>;

    /// Fails with [`StorageError::ForeignKeyViolation`] while bookings reference it.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    async fn count(&self) -> Result<i64, StorageError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Every booking, newest first.
    async fn list_all(&self) -> Result<Vec<BookingDetails>, StorageError>;

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<BookingDetails>, StorageError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<BookingDetails>, StorageError>;

    async fn create(&self, booking: NewBooking) -> Result<BookingDetails, StorageError>;

    async fn update(&self, id: i64, changes: BookingChanges) -> Result<Option<BookingDetails>, StorageError>;

    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    async fn count(&self) -> Result<i64, StorageError>;
}
