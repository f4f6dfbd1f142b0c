use crate::traits::data_objects::{GatewayOrder, GatewayOrderRequest, GatewayPayment, GatewayRefund, GatewayRefundRequest};

/// The contract with the third-party payment processor.
///
/// Implementations make synchronous network calls. Callers must never hold a database transaction open across these
/// calls.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    type Error: std::error::Error;

    /// The public key id handed to the checkout client alongside the gateway order id.
    fn key_id(&self) -> &str;

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, Self::Error>;

    async fn fetch_payment(&self, gateway_payment_id: &str) -> Result<GatewayPayment, Self::Error>;

    async fn refund_payment(
        &self,
        gateway_payment_id: &str,
        request: GatewayRefundRequest,
    ) -> Result<GatewayRefund, Self::Error>;
}
