use crate::{
    db_types::{NewPayment, Payment, PaymentUpdate, RefundRecord},
    traits::{data_objects::PaymentUpdateResult, MarketplaceError},
};

/// Local payment records. A payment is tied 1:1 to an order, and the order's `payment_status` always mirrors the
/// payment's status.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement: Clone {
    async fn fetch_payment(&self, payment_id: i64) -> Result<Option<Payment>, MarketplaceError>;

    async fn fetch_payment_for_order(&self, order_id: i64) -> Result<Option<Payment>, MarketplaceError>;

    async fn fetch_payment_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Payment>, MarketplaceError>;

    /// Stores a new payment. Fails with `AlreadyExists` if the order already has a payment, and with `InvalidState` if
    /// the order is no longer `Pending`.
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, MarketplaceError>;

    /// Applies a status update to the payment with the given gateway order id.
    ///
    /// This is idempotent. Setting the current status again changes nothing but merges in any new details. A move
    /// that [`crate::db_types::PaymentStatus::allowed_next`] does not permit leaves the status alone and is reported as
    /// [`PaymentUpdateResult::Ignored`]. The `webhook_verified` flag is applied in every case.
    async fn update_payment_status(
        &self,
        gateway_order_id: &str,
        update: PaymentUpdate,
    ) -> Result<PaymentUpdateResult, MarketplaceError>;

    /// Records a completed gateway refund and marks the payment and order `Refunded`. The payment must be `Success`.
    async fn record_refund(&self, order_id: i64, refund: RefundRecord) -> Result<Payment, MarketplaceError>;
}
