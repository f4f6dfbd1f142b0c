//! An in-process stand-in for the payment gateway.
//!
//! The mock hands out sequential ids, records every request it receives, and can be told to fail the next call of
//! any kind. Clones share state, so a test can keep one handle while the engine uses another.
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::{
    helpers::payment_signature,
    traits::{
        data_objects::{
            GatewayOrder,
            GatewayOrderRequest,
            GatewayPayment,
            GatewayRefund,
            GatewayRefundRequest,
        },
        PaymentGateway,
    },
};

pub const MOCK_KEY_ID: &str = "rzp_test_mock";

#[derive(Debug, Clone, Error)]
#[error("Mock gateway failure: {0}")]
pub struct MockGatewayError(pub String);

#[derive(Debug, Default)]
pub struct MockGatewayState {
    pub orders: Vec<GatewayOrderRequest>,
    pub refunds: Vec<(String, GatewayRefundRequest)>,
    pub payments: Vec<GatewayPayment>,
    pub fail_create_order: bool,
    pub fail_fetch_payment: bool,
    pub fail_refund: bool,
    counter: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockGatewayState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockGatewayState> {
        self.state.lock().expect("Mock gateway lock poisoned")
    }

    /// Registers the details the gateway will report for a payment.
    pub fn add_payment(&self, payment: GatewayPayment) {
        self.state().payments.push(payment);
    }

    pub fn set_fail_create_order(&self, fail: bool) {
        self.state().fail_create_order = fail;
    }

    pub fn set_fail_fetch_payment(&self, fail: bool) {
        self.state().fail_fetch_payment = fail;
    }

    pub fn set_fail_refund(&self, fail: bool) {
        self.state().fail_refund = fail;
    }

    pub fn order_requests(&self) -> Vec<GatewayOrderRequest> {
        self.state().orders.clone()
    }

    pub fn refund_requests(&self) -> Vec<(String, GatewayRefundRequest)> {
        self.state().refunds.clone()
    }

    /// What the customer's browser would receive from the gateway's checkout widget.
    pub fn checkout_signature(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
        payment_signature(secret, gateway_order_id, gateway_payment_id)
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state();
        state.counter += 1;
        format!("{prefix}_mock{:06}", state.counter)
    }
}

impl PaymentGateway for MockGateway {
    type Error = MockGatewayError;

    fn key_id(&self) -> &str {
        MOCK_KEY_ID
    }

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, Self::Error> {
        if self.state().fail_create_order {
            return Err(MockGatewayError("create_order is down".into()));
        }
        let id = self.next_id("order");
        let order =
            GatewayOrder { id, amount: request.amount, currency: request.currency.clone(), status: "created".into() };
        self.state().orders.push(request);
        Ok(order)
    }

    async fn fetch_payment(&self, gateway_payment_id: &str) -> Result<GatewayPayment, Self::Error> {
        let state = self.state();
        if state.fail_fetch_payment {
            return Err(MockGatewayError("fetch_payment is down".into()));
        }
        let payment = state.payments.iter().find(|p| p.id == gateway_payment_id).cloned();
        Ok(payment.unwrap_or_else(|| GatewayPayment {
            id: gateway_payment_id.to_string(),
            status: "captured".into(),
            method: Some("upi".into()),
            vpa: Some("customer@upi".into()),
            ..Default::default()
        }))
    }

    async fn refund_payment(
        &self,
        gateway_payment_id: &str,
        request: GatewayRefundRequest,
    ) -> Result<GatewayRefund, Self::Error> {
        if self.state().fail_refund {
            return Err(MockGatewayError("refunds are down".into()));
        }
        let id = self.next_id("rfnd");
        let refund = GatewayRefund { id, amount: request.amount, status: "processed".into() };
        self.state().refunds.push((gateway_payment_id.to_string(), request));
        Ok(refund)
    }
}
