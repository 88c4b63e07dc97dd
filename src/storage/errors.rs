//! Storage errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// `ON DELETE RESTRICT` actions fail immediately as SQLITE_CONSTRAINT_TRIGGER
/// (1811) rather than SQLITE_CONSTRAINT_FOREIGNKEY (787).
fn is_restrict_violation(db_err: &dyn sqlx::error::DatabaseError) -> bool {
    db_err.code().as_deref() == Some("1811") && db_err.message().contains("FOREIGN KEY")
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation;
            }
            if db_err.is_foreign_key_violation() || is_restrict_violation(db_err) {
                return Self::ForeignKeyViolation;
            }
        }
        match err {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::Corrupt(format!("column {index}: {source}"))
            }
            other => Self::Database(other),
        }
    }
}
