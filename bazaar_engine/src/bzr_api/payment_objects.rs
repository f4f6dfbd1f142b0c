use bazaar_common::{Secret, CURRENCY_CODE};
use serde::{Deserialize, Serialize};

use crate::db_types::{Money, PaymentStatus};

/// Settings for the payment reconciliation flow.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// The secret shared with the gateway. It keys both checkout signatures and webhook signatures.
    pub webhook_secret: Secret<String>,
    pub currency: String,
    /// Passed through to the gateway on refund requests (`normal` or `optimum`).
    pub refund_speed: String,
    /// When false, webhook signatures are not checked. Only ever disable this in development.
    pub webhook_checks: bool,
}

impl PaymentConfig {
    pub fn new<S: Into<String>>(webhook_secret: S) -> Self {
        Self { webhook_secret: Secret::new(webhook_secret.into()), ..Default::default() }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            webhook_secret: Secret::default(),
            currency: CURRENCY_CODE.to_string(),
            refund_speed: "normal".to_string(),
            webhook_checks: true,
        }
    }
}

/// Everything the customer's checkout widget needs to complete a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub payment_id: i64,
    pub gateway_order_id: String,
    pub key_id: String,
    pub amount: Money,
    pub currency: String,
    pub customer_phone: Option<String>,
    pub description: String,
}

/// The proof the customer's browser receives from the gateway after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub payment_id: i64,
    pub gateway_payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResult {
    pub refund_id: String,
    pub amount: Money,
    pub status: String,
    pub reason: String,
}

/// What happened to an incoming webhook. Webhooks are never answered with an error, so this is for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The signature did not match. The payload was not looked at.
    BadSignature,
    /// The body could not be read as a payment webhook.
    Malformed,
    /// No local payment carries the gateway order id.
    UnknownPayment(String),
    /// The event type is not one we act on.
    UnhandledEvent(String),
    /// The event could not be stored.
    StorageError(String),
    /// The event was applied. `changed` is false for replays and for moves the payment status graph does not allow.
    Applied { gateway_order_id: String, status: PaymentStatus, changed: bool },
}

//--------------------------------------   Webhook payloads  ---------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WebhookBody {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct WebhookPayload {
    pub payment: Option<WebhookPaymentWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WebhookPaymentWrapper {
    pub entity: WebhookPaymentEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WebhookPaymentEntity {
    pub id: String,
    pub order_id: Option<String>,
    pub method: Option<String>,
    pub error_description: Option<String>,
}
