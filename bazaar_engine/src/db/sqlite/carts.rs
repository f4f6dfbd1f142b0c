use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{Cart, CartItem, Money},
    traits::{data_objects::CartContents, MarketplaceError},
};

const CART_ITEM_QUERY: &str = r#"
    SELECT
        cart_items.id,
        cart_items.cart_id,
        cart_items.product_id,
        products.name AS product_name,
        cart_items.quantity,
        cart_items.price,
        cart_items.created_at
    FROM cart_items JOIN products ON products.id = cart_items.product_id
"#;

pub async fn fetch_cart(customer_id: i64, conn: &mut SqliteConnection) -> Result<Option<Cart>, MarketplaceError> {
    let cart = sqlx::query_as::<_, Cart>(
        "SELECT id, customer_id, vendor_id, created_at, updated_at FROM carts WHERE customer_id = $1",
    )
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    Ok(cart)
}

pub async fn fetch_cart_items(cart_id: i64, conn: &mut SqliteConnection) -> Result<Vec<CartItem>, MarketplaceError> {
    let sql = format!("{CART_ITEM_QUERY} WHERE cart_items.cart_id = $1 ORDER BY cart_items.id ASC");
    let items = sqlx::query_as::<_, CartItem>(&sql).bind(cart_id).fetch_all(conn).await?;
    Ok(items)
}

pub async fn fetch_cart_contents(
    customer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<CartContents>, MarketplaceError> {
    let Some(cart) = fetch_cart(customer_id, &mut *conn).await? else {
        return Ok(None);
    };
    let items = fetch_cart_items(cart.id, conn).await?;
    Ok(Some(CartContents { cart, items }))
}

pub async fn fetch_cart_item(item_id: i64, conn: &mut SqliteConnection) -> Result<Option<CartItem>, MarketplaceError> {
    let sql = format!("{CART_ITEM_QUERY} WHERE cart_items.id = $1");
    let item = sqlx::query_as::<_, CartItem>(&sql).bind(item_id).fetch_optional(conn).await?;
    Ok(item)
}

pub async fn insert_cart(customer_id: i64, vendor_id: i64, conn: &mut SqliteConnection) -> Result<Cart, MarketplaceError> {
    let cart = sqlx::query_as::<_, Cart>(
        r#"
            INSERT INTO carts (customer_id, vendor_id) VALUES ($1, $2)
            RETURNING id, customer_id, vendor_id, created_at, updated_at;
        "#,
    )
    .bind(customer_id)
    .bind(vendor_id)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Cart #{} opened for customer #{customer_id} with vendor #{vendor_id}", cart.id);
    Ok(cart)
}

/// Points an (empty) cart at a different vendor.
pub async fn set_cart_vendor(cart_id: i64, vendor_id: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE carts SET vendor_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(vendor_id)
        .bind(cart_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn touch_cart(cart_id: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE carts SET updated_at = CURRENT_TIMESTAMP WHERE id = $1").bind(cart_id).execute(conn).await?;
    Ok(())
}

pub async fn delete_cart(cart_id: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1").bind(cart_id).execute(&mut *conn).await?;
    sqlx::query("DELETE FROM carts WHERE id = $1").bind(cart_id).execute(conn).await?;
    debug!("🗃️ Cart #{cart_id} deleted");
    Ok(())
}

pub async fn insert_cart_item(
    cart_id: i64,
    product_id: i64,
    quantity: i64,
    price: Money,
    conn: &mut SqliteConnection,
) -> Result<(), MarketplaceError> {
    sqlx::query("INSERT INTO cart_items (cart_id, product_id, quantity, price) VALUES ($1, $2, $3, $4)")
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .execute(conn)
        .await?;
    trace!("🗃️ {quantity} x product #{product_id} added to cart #{cart_id}");
    Ok(())
}

pub async fn set_item_quantity(item_id: i64, quantity: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE cart_items SET quantity = $1 WHERE id = $2").bind(quantity).bind(item_id).execute(conn).await?;
    Ok(())
}

pub async fn delete_cart_item(item_id: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("DELETE FROM cart_items WHERE id = $1").bind(item_id).execute(conn).await?;
    Ok(())
}
