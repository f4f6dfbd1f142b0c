use log::{debug, trace};
use sqlx::SqliteConnection;

use super::errors::is_unique_violation;
use crate::{
    db_types::{NewPayment, Payment, PaymentStatus, PaymentUpdate, RefundRecord},
    traits::MarketplaceError,
};

const PAYMENT_COLUMNS: &str = r#"
    id, order_id, gateway_order_id, gateway_payment_id, gateway_signature, status, amount, currency, method,
    card_last4, card_network, upi_vpa, wallet, bank, failure_reason, refund_id, refund_amount, refunded_at,
    webhook_verified, created_at, updated_at
"#;

pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<Payment, MarketplaceError> {
    let sql = format!(
        r#"
        INSERT INTO payments (order_id, gateway_order_id, amount, currency) VALUES ($1, $2, $3, $4)
        RETURNING {PAYMENT_COLUMNS};
        "#
    );
    let order_id = payment.order_id;
    let payment = sqlx::query_as::<_, Payment>(&sql)
        .bind(payment.order_id)
        .bind(payment.gateway_order_id)
        .bind(payment.amount)
        .bind(payment.currency)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                MarketplaceError::AlreadyExists(format!("A payment for order #{order_id}"))
            } else {
                MarketplaceError::from(e)
            }
        })?;
    debug!("🗃️ Payment #{} [{}] saved for order #{}", payment.id, payment.gateway_order_id, payment.order_id);
    Ok(payment)
}

pub async fn fetch_payment(payment_id: i64, conn: &mut SqliteConnection) -> Result<Option<Payment>, MarketplaceError> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1");
    let payment = sqlx::query_as::<_, Payment>(&sql).bind(payment_id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn fetch_payment_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, MarketplaceError> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = $1");
    let payment = sqlx::query_as::<_, Payment>(&sql).bind(order_id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn fetch_payment_by_gateway_order_id(
    gateway_order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, MarketplaceError> {
    let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE gateway_order_id = $1");
    let payment = sqlx::query_as::<_, Payment>(&sql).bind(gateway_order_id).fetch_optional(conn).await?;
    Ok(payment)
}

/// Writes the new status and merges any supplied details into the payment row. Fields that are `None` in the update
/// keep their current value.
pub async fn apply_update(
    payment_id: i64,
    status: PaymentStatus,
    update: &PaymentUpdate,
    conn: &mut SqliteConnection,
) -> Result<(), MarketplaceError> {
    let details = update.method_details.clone().unwrap_or_default();
    sqlx::query(
        r#"
        UPDATE payments SET
            status = $1,
            gateway_payment_id = COALESCE($2, gateway_payment_id),
            gateway_signature = COALESCE($3, gateway_signature),
            method = COALESCE($4, method),
            card_last4 = COALESCE($5, card_last4),
            card_network = COALESCE($6, card_network),
            upi_vpa = COALESCE($7, upi_vpa),
            wallet = COALESCE($8, wallet),
            bank = COALESCE($9, bank),
            failure_reason = COALESCE($10, failure_reason),
            webhook_verified = (webhook_verified OR $11),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $12
        "#,
    )
    .bind(status)
    .bind(&update.gateway_payment_id)
    .bind(&update.gateway_signature)
    .bind(details.method)
    .bind(details.card_last4)
    .bind(details.card_network)
    .bind(details.upi_vpa)
    .bind(details.wallet)
    .bind(details.bank)
    .bind(&update.failure_reason)
    .bind(update.webhook_verified)
    .bind(payment_id)
    .execute(conn)
    .await?;
    trace!("🗃️ Payment #{payment_id} written with status {status}");
    Ok(())
}

pub async fn mark_webhook_verified(payment_id: i64, conn: &mut SqliteConnection) -> Result<(), MarketplaceError> {
    sqlx::query("UPDATE payments SET webhook_verified = 1, updated_at = CURRENT_TIMESTAMP WHERE id = $1")
        .bind(payment_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn mark_refunded(
    payment_id: i64,
    refund: &RefundRecord,
    conn: &mut SqliteConnection,
) -> Result<(), MarketplaceError> {
    sqlx::query(
        r#"
        UPDATE payments SET
            status = $1,
            refund_id = $2,
            refund_amount = $3,
            refunded_at = CURRENT_TIMESTAMP,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $4
        "#,
    )
    .bind(PaymentStatus::Refunded)
    .bind(&refund.refund_id)
    .bind(refund.amount)
    .bind(payment_id)
    .execute(conn)
    .await?;
    debug!("🗃️ Payment #{payment_id} refunded ({}, {})", refund.refund_id, refund.amount);
    Ok(())
}
