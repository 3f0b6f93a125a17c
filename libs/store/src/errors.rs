//! Store error classification.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Typed error for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("Uniqueness violation: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if is_unique_violation(&err) {
            StoreError::Conflict(err.to_string())
        } else {
            StoreError::Database(err)
        }
    }
}

/// Returns true when the error is a unique constraint violation, across
/// backends (Postgres 23505, SQLite 2067).
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
