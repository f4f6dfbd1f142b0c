//! Connects the engine's [`PaymentGateway`] contract to the Razorpay REST client.
use bazaar_engine::{
    db_types::Money,
    traits::data_objects::{GatewayOrder, GatewayOrderRequest, GatewayPayment, GatewayRefund, GatewayRefundRequest},
    PaymentGateway,
};
use log::*;
use razorpay_tools::{
    NewRazorpayOrder,
    NewRefund,
    RazorpayApi,
    RazorpayApiError,
    RazorpayConfig,
    RazorpayOrder,
    RazorpayPayment,
    RazorpayRefund,
};

#[derive(Clone)]
pub struct RazorpayGateway {
    api: RazorpayApi,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let api = RazorpayApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentGateway for RazorpayGateway {
    type Error = RazorpayApiError;

    fn key_id(&self) -> &str {
        self.api.key_id()
    }

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, Self::Error> {
        let notes = serde_json::json!(request.notes);
        let order = NewRazorpayOrder::new(request.amount, &request.currency, &request.receipt, notes);
        self.api.create_order(order).await.map(gateway_order)
    }

    async fn fetch_payment(&self, gateway_payment_id: &str) -> Result<GatewayPayment, Self::Error> {
        self.api.fetch_payment(gateway_payment_id).await.map(gateway_payment)
    }

    async fn refund_payment(
        &self,
        gateway_payment_id: &str,
        request: GatewayRefundRequest,
    ) -> Result<GatewayRefund, Self::Error> {
        let notes = serde_json::json!(request.notes);
        let refund = NewRefund::new(request.amount, &request.speed, notes);
        let refund = self.api.refund_payment(gateway_payment_id, refund).await?;
        if refund.payment_id != gateway_payment_id {
            warn!("💳️ Refund {} was issued against {}, not {gateway_payment_id}", refund.id, refund.payment_id);
        }
        Ok(gateway_refund(refund))
    }
}

fn gateway_order(order: RazorpayOrder) -> GatewayOrder {
    GatewayOrder {
        id: order.id,
        amount: Money::from_paise(order.amount),
        currency: order.currency,
        status: order.status,
    }
}

fn gateway_payment(payment: RazorpayPayment) -> GatewayPayment {
    let (card_last4, card_network) = match payment.card {
        Some(card) => (card.last4, card.network),
        None => (None, None),
    };
    GatewayPayment {
        id: payment.id,
        order_id: payment.order_id,
        status: payment.status,
        method: payment.method,
        card_last4,
        card_network,
        vpa: payment.vpa,
        wallet: payment.wallet,
        bank: payment.bank,
        error_description: payment.error_description,
    }
}

fn gateway_refund(refund: RazorpayRefund) -> GatewayRefund {
    GatewayRefund { id: refund.id, amount: Money::from_paise(refund.amount), status: refund.status }
}
