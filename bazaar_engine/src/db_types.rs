use std::{fmt::Display, str::FromStr};

pub use bazaar_common::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion from string: {0}")]
pub struct ConversionError(String);

//--------------------------------------      Vendor         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub shop_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Vendor {
    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_options(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewVendor {
    pub shop_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NewVendor {
    pub fn new<S: Into<String>>(shop_name: S) -> Self {
        Self { shop_name: shop_name.into(), latitude: None, longitude: None }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn from_options(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }
}

//--------------------------------------      Product        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub vendor_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Money,
    pub stock: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Money,
    pub stock: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl NewProduct {
    pub fn new<S: Into<String>>(name: S, price: Money, stock: i64) -> Self {
        Self { name: name.into(), description: None, image_url: None, price, stock, active: true }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url<S: Into<String>>(mut self, url: S) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Money>,
}

impl ProductUpdate {
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.image_url.is_none() && self.price.is_none()
    }
}

//--------------------------------------        Cart         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub customer_id: i64,
    pub vendor_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    /// The unit price at the moment the item was first added to the cart.
    pub price: Money,
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// A single (product, quantity) pair requested by a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
}

impl CartLine {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatusType {
    /// The order has been placed and is waiting for the vendor.
    Pending,
    Accepted,
    InProgress,
    Ready,
    OutForDelivery,
    Delivered,
    Rejected,
    Cancelled,
}

impl OrderStatusType {
    pub const ALL: [OrderStatusType; 8] = [
        OrderStatusType::Pending,
        OrderStatusType::Accepted,
        OrderStatusType::InProgress,
        OrderStatusType::Ready,
        OrderStatusType::OutForDelivery,
        OrderStatusType::Delivered,
        OrderStatusType::Rejected,
        OrderStatusType::Cancelled,
    ];

    /// The order status transition graph. Every status change, regardless of who requests it, is checked against
    /// this table.
    pub fn allowed_next(&self) -> &'static [OrderStatusType] {
        use OrderStatusType::*;
        match self {
            Pending => &[Accepted, Rejected, Cancelled],
            Accepted => &[InProgress, Cancelled],
            InProgress => &[Ready, Cancelled],
            Ready => &[OutForDelivery, Delivered, Cancelled],
            OutForDelivery => &[Delivered, Cancelled],
            Delivered | Rejected | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatusType) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Customers may only cancel before the vendor starts preparing the order.
    pub fn is_customer_cancellable(&self) -> bool {
        matches!(self, OrderStatusType::Pending | OrderStatusType::Accepted)
    }

    /// Statuses that hand the ordered stock back to the ledger.
    pub fn restores_stock(&self) -> bool {
        matches!(self, OrderStatusType::Rejected | OrderStatusType::Cancelled)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatusType::Pending => "PENDING",
            OrderStatusType::Accepted => "ACCEPTED",
            OrderStatusType::InProgress => "IN_PROGRESS",
            OrderStatusType::Ready => "READY",
            OrderStatusType::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatusType::Delivered => "DELIVERED",
            OrderStatusType::Rejected => "REJECTED",
            OrderStatusType::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|st| st.to_string().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ConversionError(format!("Invalid order status: {s}")))
    }
}

//--------------------------------------    PaymentStatus    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Created,
    Pending,
    Success,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Gateway signals may arrive out of order or more than once. This is the set of moves that are allowed to take
    /// effect. Anything else is ignored by the reconciliation logic.
    ///
    /// `Failed -> Success` is allowed, since a customer may retry a failed payment against the same gateway order.
    pub fn allowed_next(&self) -> &'static [PaymentStatus] {
        use PaymentStatus::*;
        match self {
            Created => &[Pending, Success, Failed],
            Pending => &[Success, Failed],
            Failed => &[Success],
            Success => &[Refunded],
            Refunded => &[],
        }
    }

    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Created => "CREATED",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATED" => Ok(Self::Created),
            "PENDING" => Ok(Self::Pending),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            "REFUNDED" => Ok(Self::Refunded),
            _ => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------       Order         ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub customer_phone: Option<String>,
    pub special_instructions: Option<String>,
}

impl DeliveryInfo {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self { address: address.into(), ..Default::default() }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_options(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub vendor_id: i64,
    pub status: OrderStatusType,
    pub payment_status: PaymentStatus,
    pub subtotal: Money,
    pub platform_fee: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub customer_phone: Option<String>,
    pub special_instructions: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub estimated_delivery_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A frozen copy of a cart item, taken at checkout. Later product edits never reach these rows.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_image_url: Option<String>,
    pub quantity: i64,
    pub price_at_time: Money,
    pub line_total: Money,
}

/// Who is asking for an order status change. Ownership of the order is checked against this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Customer(i64),
    Vendor(i64),
}

impl Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Customer(id) => write!(f, "customer #{id}"),
            Actor::Vendor(id) => write!(f, "vendor #{id}"),
        }
    }
}

/// A request to move an order to a new status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    pub actor: Actor,
    pub new_status: OrderStatusType,
    pub reason: Option<String>,
    /// Only meaningful when accepting an order.
    pub estimated_minutes: Option<i64>,
}

impl OrderTransition {
    pub fn new(actor: Actor, new_status: OrderStatusType) -> Self {
        Self { actor, new_status, reason: None, estimated_minutes: None }
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_estimated_minutes(mut self, minutes: Option<i64>) -> Self {
        self.estimated_minutes = minutes;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueryFilter {
    pub customer_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub statuses: Vec<OrderStatusType>,
}

impl OrderQueryFilter {
    pub fn with_customer_id(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_vendor_id(mut self, vendor_id: i64) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none() && self.vendor_id.is_none() && self.statuses.is_empty()
    }
}

//--------------------------------------      Payment        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub status: PaymentStatus,
    pub amount: Money,
    pub currency: String,
    pub method: Option<String>,
    pub card_last4: Option<String>,
    pub card_network: Option<String>,
    pub upi_vpa: Option<String>,
    pub wallet: Option<String>,
    pub bank: Option<String>,
    pub failure_reason: Option<String>,
    pub refund_id: Option<String>,
    pub refund_amount: Option<Money>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub webhook_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub order_id: i64,
    pub gateway_order_id: String,
    pub amount: Money,
    pub currency: String,
}

/// The method-specific fields of a captured payment. Only the fields relevant to `method` are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodDetails {
    pub method: Option<String>,
    pub card_last4: Option<String>,
    pub card_network: Option<String>,
    pub upi_vpa: Option<String>,
    pub wallet: Option<String>,
    pub bank: Option<String>,
}

/// A requested change to a payment record. Status moves are filtered through [`PaymentStatus::allowed_next`]; the
/// remaining fields are merged in whenever they are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub status: PaymentStatus,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub method_details: Option<PaymentMethodDetails>,
    pub failure_reason: Option<String>,
    pub webhook_verified: bool,
}

impl PaymentUpdate {
    pub fn new(status: PaymentStatus) -> Self {
        Self {
            status,
            gateway_payment_id: None,
            gateway_signature: None,
            method_details: None,
            failure_reason: None,
            webhook_verified: false,
        }
    }

    pub fn with_gateway_payment_id<S: Into<String>>(mut self, id: S) -> Self {
        self.gateway_payment_id = Some(id.into());
        self
    }

    pub fn with_signature<S: Into<String>>(mut self, signature: S) -> Self {
        self.gateway_signature = Some(signature.into());
        self
    }

    pub fn with_method_details(mut self, details: PaymentMethodDetails) -> Self {
        self.method_details = Some(details);
        self
    }

    pub fn with_failure_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.failure_reason = Some(reason.into());
        self
    }

    pub fn from_webhook(mut self) -> Self {
        self.webhook_verified = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundRecord {
    pub refund_id: String,
    pub amount: Money,
}
