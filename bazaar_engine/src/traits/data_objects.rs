use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db_types::{
    Cart,
    CartItem,
    Money,
    Order,
    OrderItem,
    OrderStatusType,
    Payment,
    PaymentMethodDetails,
    PaymentStatus,
};

//--------------------------------------   Backend results   ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartContents {
    pub cart: Cart,
    pub items: Vec<CartItem>,
}

impl CartContents {
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// An order together with its item snapshots and its payment, if one has been created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub payment: Option<Payment>,
}

impl OrderDetails {
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|i| i.line_total).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub old_status: OrderStatusType,
    pub details: OrderDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentUpdateResult {
    /// The status moved from `old_status` to the requested status.
    Updated { old_status: PaymentStatus, payment: Payment },
    /// The payment was already in the requested status.
    Unchanged(Payment),
    /// The requested status is not reachable from the current one. The status was left alone.
    Ignored { requested: PaymentStatus, payment: Payment },
}

impl PaymentUpdateResult {
    pub fn payment(&self) -> &Payment {
        match self {
            Self::Updated { payment, .. } | Self::Unchanged(payment) | Self::Ignored { payment, .. } => payment,
        }
    }

    pub fn into_payment(self) -> Payment {
        match self {
            Self::Updated { payment, .. } | Self::Unchanged(payment) | Self::Ignored { payment, .. } => payment,
        }
    }
}

//--------------------------------------   Gateway messages  ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    pub amount: Money,
    pub currency: String,
    /// Our order number
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: Money,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub status: String,
    pub method: Option<String>,
    pub card_last4: Option<String>,
    pub card_network: Option<String>,
    pub vpa: Option<String>,
    pub wallet: Option<String>,
    pub bank: Option<String>,
    pub error_description: Option<String>,
}

impl GatewayPayment {
    /// Picks out the fields that are relevant to the reported payment method.
    pub fn method_details(&self) -> PaymentMethodDetails {
        let mut details = PaymentMethodDetails { method: self.method.clone(), ..Default::default() };
        match self.method.as_deref() {
            Some("card") => {
                details.card_last4 = self.card_last4.clone();
                details.card_network = self.card_network.clone();
            },
            Some("upi") => details.upi_vpa = self.vpa.clone(),
            Some("wallet") => details.wallet = self.wallet.clone(),
            Some("netbanking") => details.bank = self.bank.clone(),
            _ => {},
        }
        details
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRefundRequest {
    pub amount: Money,
    pub speed: String,
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRefund {
    pub id: String,
    pub amount: Money,
    pub status: String,
}
