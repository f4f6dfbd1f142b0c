use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderStatusType, Payment, PaymentStatus};

/// Published after an order status change has been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub old_status: OrderStatusType,
    pub order: Order,
}

impl OrderStatusChangedEvent {
    pub fn new(old_status: OrderStatusType, order: Order) -> Self {
        Self { old_status, order }
    }
}

/// Published after a payment status change has been committed. Replayed webhooks that change nothing do not produce
/// this event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatusChangedEvent {
    pub old_status: PaymentStatus,
    pub payment: Payment,
}

impl PaymentStatusChangedEvent {
    pub fn new(old_status: PaymentStatus, payment: Payment) -> Self {
        Self { old_status, payment }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventType {
    OrderStatusChanged(OrderStatusChangedEvent),
    PaymentStatusChanged(PaymentStatusChangedEvent),
}
