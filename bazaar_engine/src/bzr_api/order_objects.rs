use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Cart, CartItem, OrderStatusType},
    fees::{FeeBreakdown, FeeSchedule},
    traits::{data_objects::CartContents, MarketplaceError},
};

/// A cart with its derived totals. The totals are always computed from the items; they are never stored.
///
/// The delivery location is unknown until checkout, so cart totals use the schedule's default delivery fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub cart: Cart,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub fees: FeeBreakdown,
}

impl CartSummary {
    pub fn from_contents(contents: CartContents, fees: &FeeSchedule) -> Result<Self, MarketplaceError> {
        let item_count = contents.item_count();
        let breakdown = fees.calculate(contents.subtotal(), None)?;
        // An empty cart has nothing to deliver
        let breakdown = if contents.items.is_empty() {
            FeeBreakdown { delivery_fee: Default::default(), total: breakdown.subtotal, ..breakdown }
        } else {
            breakdown
        };
        Ok(Self { cart: contents.cart, items: contents.items, item_count, fees: breakdown })
    }
}

/// The optional status filter accepted by the order listing calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatusType>,
}
