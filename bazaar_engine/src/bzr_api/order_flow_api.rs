use std::fmt::Debug;

use log::*;

use crate::{
    bzr_api::payment_api::PaymentApi,
    db_types::{Actor, DeliveryInfo, OrderQueryFilter, OrderStatusType, OrderTransition, PaymentStatus},
    events::{EventProducers, OrderStatusChangedEvent},
    fees::FeeSchedule,
    traits::{data_objects::OrderDetails, MarketplaceError, OrderManagement, PaymentGateway, PaymentManagement},
};

const NO_REASON: &str = "No reason provided";

/// `OrderFlowApi` drives orders from checkout to delivery.
///
/// Status changes are checked against the order status graph (see [`OrderStatusType::allowed_next`]). Customers may
/// only cancel, and only while the order is `Pending` or `Accepted`. Vendors may make any other move the graph allows.
///
/// Rejecting or cancelling an order puts its stock back. If the order was paid for, a full refund is requested from the
/// gateway after the status change has been committed. A refund that fails is logged for manual follow-up and does
/// not undo the status change.
pub struct OrderFlowApi<B, G> {
    db: B,
    payments: PaymentApi<B, G>,
    fees: FeeSchedule,
    producers: EventProducers,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B: Clone, G: Clone> Clone for OrderFlowApi<B, G> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            payments: self.payments.clone(),
            fees: self.fees.clone(),
            producers: self.producers.clone(),
        }
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, payments: PaymentApi<B, G>, fees: FeeSchedule, producers: EventProducers) -> Self {
        Self { db, payments, fees, producers }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: OrderManagement + PaymentManagement,
    G: PaymentGateway,
{
    /// Places an order for everything in the customer's cart. The cart is deleted on success.
    pub async fn create_from_cart(&self, customer_id: i64, delivery: DeliveryInfo) -> Result<OrderDetails, MarketplaceError> {
        validate_delivery(&delivery)?;
        let details = self.db.create_order_from_cart(customer_id, delivery, &self.fees).await?;
        let order = &details.order;
        info!(
            "📦️ Order {} placed by customer #{customer_id} with vendor #{}. {} items, total {}",
            order.order_number,
            order.vendor_id,
            details.items.len(),
            order.total
        );
        Ok(details)
    }

    pub async fn orders_for_customer(
        &self,
        customer_id: i64,
        status: Option<OrderStatusType>,
    ) -> Result<Vec<OrderDetails>, MarketplaceError> {
        let mut filter = OrderQueryFilter::default().with_customer_id(customer_id);
        if let Some(status) = status {
            filter = filter.with_status(status);
        }
        self.db.fetch_orders(filter).await
    }

    /// Fetches one of the customer's orders. Orders belonging to someone else are reported as not found.
    pub async fn order_for_customer(&self, customer_id: i64, order_id: i64) -> Result<OrderDetails, MarketplaceError> {
        match self.db.fetch_order(order_id).await? {
            Some(details) if details.order.customer_id == customer_id => Ok(details),
            _ => Err(MarketplaceError::NotFound(format!("Order #{order_id}"))),
        }
    }

    pub async fn orders_for_vendor(
        &self,
        vendor_id: i64,
        status: Option<OrderStatusType>,
    ) -> Result<Vec<OrderDetails>, MarketplaceError> {
        let mut filter = OrderQueryFilter::default().with_vendor_id(vendor_id);
        if let Some(status) = status {
            filter = filter.with_status(status);
        }
        self.db.fetch_orders(filter).await
    }

    pub async fn order_for_vendor(&self, vendor_id: i64, order_id: i64) -> Result<OrderDetails, MarketplaceError> {
        match self.db.fetch_order(order_id).await? {
            Some(details) if details.order.vendor_id == vendor_id => Ok(details),
            _ => Err(MarketplaceError::NotFound(format!("Order #{order_id}"))),
        }
    }

    pub async fn cancel_order(
        &self,
        customer_id: i64,
        order_id: i64,
        reason: Option<String>,
    ) -> Result<OrderDetails, MarketplaceError> {
        let transition = OrderTransition::new(Actor::Customer(customer_id), OrderStatusType::Cancelled).with_reason(reason);
        self.transition(order_id, transition).await
    }

    /// Accepts a pending order. If `estimated_minutes` is given, the estimated delivery time is set to that many
    /// minutes from now.
    pub async fn accept_order(
        &self,
        vendor_id: i64,
        order_id: i64,
        estimated_minutes: Option<i64>,
    ) -> Result<OrderDetails, MarketplaceError> {
        if let Some(m) = estimated_minutes {
            if m <= 0 {
                return Err(MarketplaceError::ValidationError(format!(
                    "Estimated delivery time must be positive, got {m} minutes"
                )));
            }
        }
        let transition = OrderTransition::new(Actor::Vendor(vendor_id), OrderStatusType::Accepted)
            .with_estimated_minutes(estimated_minutes);
        self.transition(order_id, transition).await
    }

    pub async fn reject_order(
        &self,
        vendor_id: i64,
        order_id: i64,
        reason: Option<String>,
    ) -> Result<OrderDetails, MarketplaceError> {
        let transition = OrderTransition::new(Actor::Vendor(vendor_id), OrderStatusType::Rejected).with_reason(reason);
        self.transition(order_id, transition).await
    }

    /// Moves an order to any status the graph allows from its current one.
    pub async fn update_status(
        &self,
        vendor_id: i64,
        order_id: i64,
        status: OrderStatusType,
        reason: Option<String>,
    ) -> Result<OrderDetails, MarketplaceError> {
        let transition = OrderTransition::new(Actor::Vendor(vendor_id), status).with_reason(reason);
        self.transition(order_id, transition).await
    }

    async fn transition(&self, order_id: i64, transition: OrderTransition) -> Result<OrderDetails, MarketplaceError> {
        let actor = transition.actor;
        let new_status = transition.new_status;
        let refund_reason = refund_reason(&transition);
        let result = self.db.transition_order(order_id, transition).await.map_err(|e| {
            debug!("📦️ {actor} could not move order #{order_id} to {new_status}. {e}");
            e
        })?;
        let old_status = result.old_status;
        let mut details = result.details;
        info!("📦️ Order {} moved from {old_status} to {new_status} by {actor}", details.order.order_number);
        self.producers.publish_order_status_changed(OrderStatusChangedEvent::new(old_status, details.order.clone())).await;
        if new_status.restores_stock() && details.order.payment_status == PaymentStatus::Success {
            match self.payments.process_refund(order_id, &refund_reason).await {
                Ok(refund) => {
                    info!("📦️ Order {} refunded. Refund id {}", details.order.order_number, refund.refund_id);
                    if let Some(refreshed) = self.db.fetch_order(order_id).await? {
                        details = refreshed;
                    }
                },
                Err(e) => error!(
                    "📦️ Order {} is {new_status}, but the refund of {} failed and needs manual attention. {e}",
                    details.order.order_number, details.order.total
                ),
            }
        }
        Ok(details)
    }
}

fn refund_reason(transition: &OrderTransition) -> String {
    let reason = transition.reason.as_deref().filter(|r| !r.trim().is_empty()).unwrap_or(NO_REASON);
    match (transition.new_status, transition.actor) {
        (OrderStatusType::Rejected, _) => format!("Order rejected by vendor: {reason}"),
        (_, Actor::Customer(_)) => format!("Order cancelled by customer: {reason}"),
        (_, Actor::Vendor(_)) => format!("Order cancelled by vendor: {reason}"),
    }
}

fn validate_delivery(delivery: &DeliveryInfo) -> Result<(), MarketplaceError> {
    if delivery.address.trim().is_empty() {
        return Err(MarketplaceError::ValidationError("Delivery address is required".into()));
    }
    match (delivery.latitude, delivery.longitude) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(MarketplaceError::ValidationError(format!("({lat}, {lon}) is not a valid location")));
            }
        },
        (None, None) => {},
        _ => return Err(MarketplaceError::ValidationError("Latitude and longitude must be given together".into())),
    }
    Ok(())
}
