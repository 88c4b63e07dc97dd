//! SQLite implementation of the stores.
//!
//! All queries are parameterized. Timestamps are written from Rust
//! (`Utc::now()`) so every row uses the same encoding.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::r#trait::{AccountStore, BookingStore, ServiceStore};
use super::StorageError;
use crate::models::{
    Account, AccountChanges, AccountRecord, Booking, BookingChanges, BookingDetails, NewAccount,
    NewBooking, NewService, ServiceChanges, ServiceSummary, SpaService, UserSummary,
};

const SCHEMA: [(&str, &str); 3] = [
    ("accounts", include_str!("../../migrations/001_create_accounts.sql")),
    ("services", include_str!("../../migrations/002_create_services.sql")),
    ("bookings", include_str!("../../migrations/003_create_bookings.sql")),
];

macro_rules! account_columns {
    () => {
        "id, first_name, last_name, email, phone, birth_date, member_since, points, \
         membership_status, is_admin, preferences, is_active, created_at, updated_at"
    };
}

macro_rules! service_columns {
    () => {
        "id, title, description, price, duration, features, category, image_url, \
         is_active, sort_order, created_at, updated_at"
    };
}

macro_rules! booking_select {
    () => {
        "SELECT b.id, b.user_id, b.service_id, b.appointment_date, b.appointment_time, \
         b.customer_name, b.customer_email, b.customer_phone, b.special_requests, b.status, \
         b.payment_status, b.notes, b.total_amount, b.created_at, b.updated_at, \
         s.title AS service_title, s.price AS service_price, s.duration AS service_duration, \
         a.first_name AS user_first_name, a.last_name AS user_last_name, a.email AS user_email \
         FROM bookings b \
         JOIN services s ON s.id = b.service_id \
         JOIN accounts a ON a.id = b.user_id"
    };
}

/// Joined booking row, split into [`BookingDetails`].
#[derive(sqlx::FromRow)]
struct BookingRow {
    #[sqlx(flatten)]
    booking: Booking,
    service_title: String,
    service_price: f64,
    service_duration: i64,
    user_first_name: String,
    user_last_name: String,
    user_email: String,
}

impl From<BookingRow> for BookingDetails {
    fn from(row: BookingRow) -> Self {
        let service = ServiceSummary {
            id: row.booking.service_id,
            title: row.service_title,
            price: row.service_price,
            duration: row.service_duration,
        };
        let user = UserSummary {
            id: row.booking.user_id,
            first_name: row.user_first_name,
            last_name: row.user_last_name,
            email: row.user_email,
        };
        Self {
            booking: row.booking,
            service,
            user,
        }
    }
}

/// SQLite-backed storage shared by every store trait.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if needed) the database and bootstrap the schema.
    ///
    /// In-memory URLs keep their connections alive for the pool's lifetime,
    /// otherwise the database would vanish with the first recycled connection.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        info!(url = %database_url, "opening database");

        let in_memory = database_url.contains(":memory:");
        let mut options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections.max(1));
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        let storage = Self { pool };
        storage.bootstrap().await?;
        Ok(storage)
    }

    /// Create missing tables. Safe to run on every start.
    pub async fn bootstrap(&self) -> Result<(), StorageError> {
        for (table, ddl) in SCHEMA {
            sqlx::raw_sql(ddl).execute(&self.pool).await?;
            debug!(table, "schema ready");
        }
        info!("database schema ready");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteStorage {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StorageError> {
        let record = sqlx::query_as::<_, AccountRecord>(concat!(
            "SELECT ",
            account_columns!(),
            ", password_hash FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StorageError> {
        let account = sqlx::query_as::<_, Account>(concat!(
            "SELECT ",
            account_columns!(),
            " FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(account)
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StorageError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, Account>(concat!(
            "INSERT INTO accounts (first_name, last_name, email, phone, password_hash, birth_date, \
             member_since, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING ",
            account_columns!()
        ))
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password_hash)
        .bind(account.birth_date)
        .bind(now)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(account_id = created.id, "account created");
        Ok(created)
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<Option<Account>, StorageError> {
        let updated = sqlx::query_as::<_, Account>(concat!(
            "UPDATE accounts SET \
             first_name = COALESCE(?, first_name), \
             last_name = COALESCE(?, last_name), \
             phone = COALESCE(?, phone), \
             preferences = COALESCE(?, preferences), \
             updated_at = ? \
             WHERE id = ? RETURNING ",
            account_columns!()
        ))
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.phone)
        .bind(changes.preferences.map(Json))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn set_flags(
        &self,
        email: &str,
        is_admin: Option<bool>,
        is_active: Option<bool>,
    ) -> Result<Option<Account>, StorageError> {
        let updated = sqlx::query_as::<_, Account>(concat!(
            "UPDATE accounts SET \
             is_admin = COALESCE(?, is_admin), \
             is_active = COALESCE(?, is_active), \
             updated_at = ? \
             WHERE email = ? RETURNING ",
            account_columns!()
        ))
        .bind(is_admin)
        .bind(is_active)
        .bind(Utc::now())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(account) = &updated {
            info!(
                account_id = account.id,
                is_admin = account.is_admin,
                is_active = account.is_active,
                "account flags changed"
            );
        }
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<Account>, StorageError> {
        let accounts = sqlx::query_as::<_, Account>(concat!(
            "SELECT ",
            account_columns!(),
            " FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ServiceStore for SqliteStorage {
    async fn list_active(&self) -> Result<Vec<SpaService>, StorageError> {
        let services = sqlx::query_as::<_, SpaService>(concat!(
            "SELECT ",
            service_columns!(),
            " FROM services WHERE is_active = 1 ORDER BY sort_order, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SpaService>, StorageError> {
        let service = sqlx::query_as::<_, SpaService>(concat!(
            "SELECT ",
            service_columns!(),
            " FROM services WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(service)
    }

    async fn create(&self, service: NewService) -> Result<SpaService, StorageError> {
        let now = Utc::now();
        let created = sqlx::query_as::<_, SpaService>(concat!(
            "INSERT INTO services (title, description, price, duration, features, category, \
             image_url, sort_order, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING ",
            service_columns!()
        ))
        .bind(&service.title)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration)
        .bind(Json(&service.features))
        .bind(&service.category)
        .bind(&service.image_url)
        .bind(service.sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(service_id = created.id, title = %created.title, "service created");
        Ok(created)
    }

    async fn update(&self, id: i64, changes: ServiceChanges) -> Result<Option<SpaService>, StorageError> {
        let updated = sqlx::query_as::<_, SpaService>(concat!(
            "UPDATE services SET \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             price = COALESCE(?, price), \
             duration = COALESCE(?, duration), \
             features = COALESCE(?, features), \
             category = COALESCE(?, category), \
             image_url = CASE WHEN ? THEN ? ELSE image_url END, \
             is_active = COALESCE(?, is_active), \
             sort_order = COALESCE(?, sort_order), \
             updated_at = ? \
             WHERE id = ? RETURNING ",
            service_columns!()
        ))
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.duration)
        .bind(changes.features.map(Json))
        .bind(changes.category)
        .bind(changes.image_url.is_some())
        .bind(changes.image_url.flatten())
        .bind(changes.is_active)
        .bind(changes.sort_order)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl BookingStore for SqliteStorage {
    async fn list_all(&self) -> Result<Vec<BookingDetails>, StorageError> {
        let rows = sqlx::query_as::<_, BookingRow>(concat!(
            booking_select!(),
            " ORDER BY b.created_at DESC, b.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<BookingDetails>, StorageError> {
        let rows = sqlx::query_as::<_, BookingRow>(concat!(
            booking_select!(),
            " WHERE b.user_id = ? ORDER BY b.created_at DESC, b.id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BookingDetails>, StorageError> {
        let row = sqlx::query_as::<_, BookingRow>(concat!(booking_select!(), " WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(BookingDetails::from))
    }

    async fn create(&self, booking: NewBooking) -> Result<BookingDetails, StorageError> {
        let now = Utc::now();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO bookings (user_id, service_id, appointment_date, appointment_time, \
             customer_name, customer_email, customer_phone, special_requests, total_amount, \
             created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(booking.user_id)
        .bind(booking.service_id)
        .bind(booking.appointment_date)
        .bind(&booking.appointment_time)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(&booking.special_requests)
        .bind(booking.total_amount)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(booking_id = id, service_id = booking.service_id, "booking created");
        BookingStore::find_by_id(self, id)
            .await?
            .ok_or_else(|| StorageError::Corrupt(format!("booking {id} missing after insert")))
    }

    async fn update(&self, id: i64, changes: BookingChanges) -> Result<Option<BookingDetails>, StorageError> {
        let result = sqlx::query(
            "UPDATE bookings SET \
             appointment_date = COALESCE(?, appointment_date), \
             appointment_time = COALESCE(?, appointment_time), \
             customer_name = COALESCE(?, customer_name), \
             customer_email = COALESCE(?, customer_email), \
             customer_phone = COALESCE(?, customer_phone), \
             special_requests = CASE WHEN ? THEN ? ELSE special_requests END, \
             status = COALESCE(?, status), \
             payment_status = COALESCE(?, payment_status), \
             notes = CASE WHEN ? THEN ? ELSE notes END, \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(changes.appointment_date)
        .bind(changes.appointment_time)
        .bind(changes.customer_name)
        .bind(changes.customer_email)
        .bind(changes.customer_phone)
        .bind(changes.special_requests.is_some())
        .bind(changes.special_requests.flatten())
        .bind(changes.status)
        .bind(changes.payment_status)
        .bind(changes.notes.is_some())
        .bind(changes.notes.flatten())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        BookingStore::find_by_id(self, id).await
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
