mod db;
mod errors;

pub mod carts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod vendors;

use std::{env, str::FromStr, time::Duration};

pub use db::{SqliteDatabase, WriteTransaction};
pub use errors::SqliteDatabaseError;
use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

const SQLITE_DB_URL: &str = "sqlite://data/bazaar.db";

pub fn db_url() -> String {
    let result = env::var("BZR_DATABASE_URL").unwrap_or_else(|_| {
        info!("🗃️ BZR_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("🗃️ Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqliteDatabaseError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| SqliteDatabaseError::InvalidUrl(format!("{url}: {e}")))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
    Ok(pool)
}
