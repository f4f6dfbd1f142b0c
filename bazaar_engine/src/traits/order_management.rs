use crate::{
    db_types::{DeliveryInfo, OrderQueryFilter, OrderTransition},
    fees::FeeSchedule,
    traits::{
        data_objects::{OrderDetails, TransitionResult},
        MarketplaceError,
    },
};

/// Orders and the stock ledger.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Converts the customer's cart into an order, in a single atomic transaction:
    /// * every cart item is re-validated against the live product (active, enough stock),
    /// * fees are calculated with `fees`, using the distance between the vendor and the delivery location,
    /// * a unique order number is allocated,
    /// * the order and its item snapshots are written,
    /// * product stock is decremented. If any product would go negative, the whole transaction is rolled back,
    /// * the cart is deleted.
    async fn create_order_from_cart(
        &self,
        customer_id: i64,
        delivery: DeliveryInfo,
        fees: &FeeSchedule,
    ) -> Result<OrderDetails, MarketplaceError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderDetails>, MarketplaceError>;

    /// Fetches orders matching the filter, newest first.
    async fn fetch_orders(&self, filter: OrderQueryFilter) -> Result<Vec<OrderDetails>, MarketplaceError>;

    /// Moves an order to a new status.
    ///
    /// The actor must own the order (as its customer or its vendor). The move must be an edge of the order status
    /// graph, and customers may only cancel, and only from `Pending` or `Accepted`. Moving to `Rejected` or `Cancelled`
    /// restores the stock of every order item in the same transaction.
    async fn transition_order(
        &self,
        order_id: i64,
        transition: OrderTransition,
    ) -> Result<TransitionResult, MarketplaceError>;
}
