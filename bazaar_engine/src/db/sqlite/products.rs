use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{NewProduct, Product, ProductUpdate},
    traits::MarketplaceError,
};

const PRODUCT_COLUMNS: &str = "id, vendor_id, name, description, image_url, price, stock, active, created_at, updated_at";

pub async fn insert_product(
    vendor_id: i64,
    product: NewProduct,
    conn: &mut SqliteConnection,
) -> Result<Product, MarketplaceError> {
    let sql = format!(
        r#"
        INSERT INTO products (vendor_id, name, description, image_url, price, stock, active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PRODUCT_COLUMNS};
        "#
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(vendor_id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.image_url)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.active)
        .fetch_one(conn)
        .await?;
    debug!("🗃️ Product #{} ({}) created for vendor #{vendor_id}", product.id, product.name);
    Ok(product)
}

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, MarketplaceError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    let product = sqlx::query_as::<_, Product>(&sql).bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Fetches a product on behalf of a vendor. Fails with `Unauthorized` if the product belongs to somebody else.
pub async fn fetch_vendor_product(
    vendor_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Product, MarketplaceError> {
    let product = fetch_product(product_id, conn)
        .await?
        .ok_or_else(|| MarketplaceError::NotFound(format!("Product #{product_id}")))?;
    if product.vendor_id != vendor_id {
        return Err(MarketplaceError::Unauthorized(format!(
            "Product #{product_id} does not belong to vendor #{vendor_id}"
        )));
    }
    Ok(product)
}

pub async fn fetch_products_for_vendor(
    vendor_id: i64,
    name_query: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, MarketplaceError> {
    let mut builder = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE vendor_id = "));
    builder.push_bind(vendor_id);
    if let Some(q) = name_query.map(str::trim).filter(|q| !q.is_empty()) {
        // LIKE is case-insensitive for ASCII in SQLite
        builder.push(" AND name LIKE ");
        builder.push_bind(format!("%{q}%"));
    }
    builder.push(" ORDER BY name ASC, id ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let products = builder.build_query_as::<Product>().fetch_all(conn).await?;
    Ok(products)
}

pub async fn update_product(
    product_id: i64,
    update: ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<(), MarketplaceError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for product #{product_id}. Update request skipped.");
        return Ok(());
    }
    let mut builder = QueryBuilder::new("UPDATE products SET updated_at = CURRENT_TIMESTAMP, ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.name {
        set_clause.push("name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(description) = update.description {
        set_clause.push("description = ");
        set_clause.push_bind_unseparated(description);
    }
    if let Some(image_url) = update.image_url {
        set_clause.push("image_url = ");
        set_clause.push_bind_unseparated(image_url);
    }
    if let Some(price) = update.price {
        set_clause.push("price = ");
        set_clause.push_bind_unseparated(price);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(product_id);
    trace!("🗃️ Executing query: {}", builder.sql());
    builder.build().execute(conn).await?;
    Ok(())
}

pub async fn set_stock(product_id: i64, stock: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE products SET stock = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(stock)
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn toggle_active(product_id: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE products SET active = NOT active, updated_at = CURRENT_TIMESTAMP WHERE id = $1")
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Takes `quantity` units out of stock. The decrement only happens if enough stock remains, so two racing checkouts
/// can never drive the count below zero. Returns `false` if there was not enough stock.
pub async fn decrement_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, MarketplaceError> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND stock >= $1",
    )
    .bind(quantity)
    .bind(product_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn restore_stock(product_id: i64, quantity: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE products SET stock = stock + $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(quantity)
        .bind(product_id)
        .execute(conn)
        .await?;
    trace!("🗃️ Restored {quantity} units of product #{product_id}");
    Ok(())
}
