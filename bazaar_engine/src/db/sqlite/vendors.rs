use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewVendor, Vendor},
    traits::MarketplaceError,
};

pub async fn insert_vendor(vendor: NewVendor, conn: &mut SqliteConnection) -> Result<Vendor, MarketplaceError> {
    let vendor = sqlx::query_as::<_, Vendor>(
        r#"
            INSERT INTO vendors (shop_name, latitude, longitude) VALUES ($1, $2, $3)
            RETURNING id, shop_name, latitude, longitude, active, created_at;
        "#,
    )
    .bind(vendor.shop_name)
    .bind(vendor.latitude)
    .bind(vendor.longitude)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Vendor #{} ({}) registered", vendor.id, vendor.shop_name);
    Ok(vendor)
}

pub async fn fetch_vendor(vendor_id: i64, conn: &mut SqliteConnection) -> Result<Option<Vendor>, MarketplaceError> {
    let vendor = sqlx::query_as::<_, Vendor>(
        "SELECT id, shop_name, latitude, longitude, active, created_at FROM vendors WHERE id = $1",
    )
    .bind(vendor_id)
    .fetch_optional(conn)
    .await?;
    Ok(vendor)
}

/// Fetches the vendor, failing with `NotFound` if it does not exist and `Unavailable` if it is not trading.
pub async fn fetch_active_vendor(vendor_id: i64, conn: &mut SqliteConnection) -> Result<Vendor, MarketplaceError> {
    let vendor =
        fetch_vendor(vendor_id, conn).await?.ok_or_else(|| MarketplaceError::NotFound(format!("Vendor #{vendor_id}")))?;
    if !vendor.active {
        return Err(MarketplaceError::Unavailable(format!("Vendor {}", vendor.shop_name)));
    }
    Ok(vendor)
}
