use bazaar_common::Money;
use serde::{Deserialize, Serialize};
use serde_json::Value;

//--------------------------------------     Orders       ------------------------------------------------------------

/// The body of `POST /orders`. Razorpay expects amounts as an integer number of minor units.
#[derive(Debug, Clone, Serialize)]
pub struct NewRazorpayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: Value,
}

impl NewRazorpayOrder {
    pub fn new(amount: Money, currency: &str, receipt: &str, notes: Value) -> Self {
        Self { amount: amount.value(), currency: currency.to_string(), receipt: receipt.to_string(), notes }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    /// Razorpay returns an empty *array* when there are no notes, and an object otherwise.
    #[serde(default)]
    pub notes: Value,
    pub created_at: i64,
}

//--------------------------------------    Payments       -----------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayCard {
    pub id: Option<String>,
    pub last4: Option<String>,
    pub network: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayPayment {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    pub currency: String,
    /// One of `created`, `authorized`, `captured`, `refunded` or `failed`.
    pub status: String,
    pub order_id: Option<String>,
    pub method: Option<String>,
    #[serde(default)]
    pub captured: bool,
    pub card: Option<RazorpayCard>,
    pub vpa: Option<String>,
    pub wallet: Option<String>,
    pub bank: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    #[serde(default)]
    pub notes: Value,
    pub created_at: Option<i64>,
}

impl RazorpayPayment {
    pub fn is_captured(&self) -> bool {
        self.status == "captured"
    }

    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }
}

//--------------------------------------     Refunds       -----------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct NewRefund {
    pub amount: i64,
    pub speed: String,
    pub notes: Value,
}

impl NewRefund {
    pub fn new(amount: Money, speed: &str, notes: Value) -> Self {
        Self { amount: amount.value(), speed: speed.to_string(), notes }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RazorpayRefund {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    pub currency: String,
    pub payment_id: String,
    pub status: String,
    pub speed_processed: Option<String>,
    pub speed_requested: Option<String>,
    #[serde(default)]
    pub notes: Value,
    pub created_at: Option<i64>,
}
