use thiserror::Error;

use crate::traits::MarketplaceError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),
}

impl From<SqliteDatabaseError> for MarketplaceError {
    fn from(e: SqliteDatabaseError) -> Self {
        MarketplaceError::DatabaseError(e.to_string())
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
