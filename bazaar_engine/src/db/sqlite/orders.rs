use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use super::payments;
use crate::{
    db_types::{
        DeliveryInfo,
        Money,
        Order,
        OrderItem,
        OrderQueryFilter,
        OrderStatusType,
        OrderTransition,
        PaymentStatus,
        Product,
    },
    fees::FeeBreakdown,
    traits::{data_objects::OrderDetails, MarketplaceError},
};

const ORDER_COLUMNS: &str = r#"
    id, order_number, customer_id, vendor_id, status, payment_status, subtotal, platform_fee, delivery_fee, total,
    delivery_address, delivery_latitude, delivery_longitude, customer_phone, special_instructions,
    accepted_at, estimated_delivery_at, rejected_at, rejection_reason, delivered_at, cancelled_at, cancellation_reason,
    created_at, updated_at
"#;

const ORDER_ITEM_COLUMNS: &str = r#"
    id, order_id, product_id, product_name, product_description, product_image_url, quantity, price_at_time, line_total
"#;

pub async fn order_number_exists(order_number: &str, conn: &mut SqliteConnection) -> Result<bool, MarketplaceError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE order_number = $1")
        .bind(order_number)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

/// Inserts the order header. This is not atomic on its own; call it inside the checkout transaction.
pub async fn insert_order(
    order_number: &str,
    customer_id: i64,
    vendor_id: i64,
    fees: &FeeBreakdown,
    delivery: &DeliveryInfo,
    conn: &mut SqliteConnection,
) -> Result<i64, MarketplaceError> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO orders (
                order_number,
                customer_id,
                vendor_id,
                subtotal,
                platform_fee,
                delivery_fee,
                total,
                delivery_address,
                delivery_latitude,
                delivery_longitude,
                customer_phone,
                special_instructions
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id;
        "#,
    )
    .bind(order_number)
    .bind(customer_id)
    .bind(vendor_id)
    .bind(fees.subtotal)
    .bind(fees.platform_fee)
    .bind(fees.delivery_fee)
    .bind(fees.total)
    .bind(&delivery.address)
    .bind(delivery.latitude)
    .bind(delivery.longitude)
    .bind(&delivery.customer_phone)
    .bind(&delivery.special_instructions)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order {order_number} saved with id {id}");
    Ok(id)
}

/// Copies the product's descriptive fields into a new order item row.
pub async fn insert_order_item(
    order_id: i64,
    product: &Product,
    quantity: i64,
    price: Money,
    conn: &mut SqliteConnection,
) -> Result<(), MarketplaceError> {
    sqlx::query(
        r#"
            INSERT INTO order_items (
                order_id,
                product_id,
                product_name,
                product_description,
                product_image_url,
                quantity,
                price_at_time,
                line_total
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(order_id)
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.image_url)
    .bind(quantity)
    .bind(price)
    .bind(price * quantity)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, MarketplaceError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
    let order = sqlx::query_as::<_, Order>(&sql).bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, MarketplaceError> {
    let sql = format!("SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id ASC");
    let items = sqlx::query_as::<_, OrderItem>(&sql).bind(order_id).fetch_all(conn).await?;
    Ok(items)
}

pub async fn fetch_order_details(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderDetails>, MarketplaceError> {
    let Some(order) = fetch_order(order_id, &mut *conn).await? else {
        return Ok(None);
    };
    with_details(order, conn).await.map(Some)
}

async fn with_details(order: Order, conn: &mut SqliteConnection) -> Result<OrderDetails, MarketplaceError> {
    let items = fetch_order_items(order.id, &mut *conn).await?;
    let payment = payments::fetch_payment_for_order(order.id, conn).await?;
    Ok(OrderDetails { order, items, payment })
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `created_at` in descending order
pub async fn fetch_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetails>, MarketplaceError> {
    let mut builder = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders "));
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(customer_id) = query.customer_id {
        where_clause.push("customer_id = ");
        where_clause.push_bind_unseparated(customer_id);
    }
    if let Some(vendor_id) = query.vendor_id {
        where_clause.push("vendor_id = ");
        where_clause.push_bind_unseparated(vendor_id);
    }
    if !query.statuses.is_empty() {
        let statuses = query.statuses.iter().map(|s| format!("'{s}'")).collect::<Vec<String>>().join(",");
        where_clause.push(format!("status IN ({statuses})"));
    }
    builder.push(" ORDER BY created_at DESC, id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(&mut *conn).await?;
    trace!("🗃️ Result of fetch_orders: {}", orders.len());
    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        result.push(with_details(order, &mut *conn).await?);
    }
    Ok(result)
}

/// Writes a status change, along with the bookkeeping fields that belong to the new status.
///
/// The update is conditional on the order still being in `from`. Returns `false` if another writer got there first.
pub async fn update_order_status(
    order_id: i64,
    from: OrderStatusType,
    transition: &OrderTransition,
    conn: &mut SqliteConnection,
) -> Result<bool, MarketplaceError> {
    let mut builder = QueryBuilder::new("UPDATE orders SET updated_at = CURRENT_TIMESTAMP, status = ");
    builder.push_bind(transition.new_status);
    match transition.new_status {
        OrderStatusType::Accepted => {
            builder.push(", accepted_at = CURRENT_TIMESTAMP");
            if let Some(minutes) = transition.estimated_minutes {
                builder.push(", estimated_delivery_at = datetime('now', ");
                builder.push_bind(format!("+{minutes} minutes"));
                builder.push(")");
            }
        },
        OrderStatusType::Rejected => {
            builder.push(", rejected_at = CURRENT_TIMESTAMP, rejection_reason = ");
            builder.push_bind(transition.reason.clone());
        },
        OrderStatusType::Cancelled => {
            builder.push(", cancelled_at = CURRENT_TIMESTAMP, cancellation_reason = ");
            builder.push_bind(transition.reason.clone());
        },
        OrderStatusType::Delivered => {
            builder.push(", delivered_at = CURRENT_TIMESTAMP");
        },
        _ => {},
    }
    builder.push(" WHERE id = ");
    builder.push_bind(order_id);
    builder.push(" AND status = ");
    builder.push_bind(from);
    trace!("🗃️ Executing query: {}", builder.sql());
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected() == 1)
}

pub async fn update_payment_status(
    order_id: i64,
    status: PaymentStatus,
    conn: &mut SqliteConnection,
) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE orders SET payment_status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(status)
        .bind(order_id)
        .execute(conn)
        .await?;
    trace!("🗃️ Order #{order_id} payment status set to {status}");
    Ok(())
}
