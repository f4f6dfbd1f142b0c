use std::{collections::BTreeMap, fmt::Debug};

use log::*;

use crate::{
    bzr_api::payment_objects::{
        PaymentConfig,
        PaymentIntent,
        PaymentProof,
        RefundResult,
        WebhookBody,
        WebhookOutcome,
    },
    db_types::{NewPayment, Order, OrderStatusType, Payment, PaymentMethodDetails, PaymentStatus, PaymentUpdate, RefundRecord},
    events::{EventProducers, PaymentStatusChangedEvent},
    helpers::{verify_payment_signature, verify_webhook_signature},
    traits::{
        data_objects::{GatewayOrderRequest, GatewayRefundRequest, OrderDetails, PaymentUpdateResult},
        MarketplaceError,
        OrderManagement,
        PaymentGateway,
        PaymentManagement,
    },
};

pub const INVALID_SIGNATURE_REASON: &str = "invalid signature";
pub const DEFAULT_FAILURE_REASON: &str = "Payment failed";

/// `PaymentApi` reconciles local payment records with the payment gateway.
///
/// Every status change, whether it comes from the customer's browser or from a webhook, goes through the backend's
/// idempotent [`PaymentManagement::update_payment_status`], so the two paths can arrive in any order, any number of
/// times.
///
/// Gateway calls are never made while a database transaction is open.
pub struct PaymentApi<B, G> {
    db: B,
    gateway: G,
    config: PaymentConfig,
    producers: EventProducers,
}

impl<B, G> Debug for PaymentApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentApi")
    }
}

impl<B: Clone, G: Clone> Clone for PaymentApi<B, G> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            gateway: self.gateway.clone(),
            config: self.config.clone(),
            producers: self.producers.clone(),
        }
    }
}

impl<B, G> PaymentApi<B, G> {
    pub fn new(db: B, gateway: G, config: PaymentConfig, producers: EventProducers) -> Self {
        if !config.webhook_checks {
            warn!(
                "🚨️🚨️🚨️ Webhook signature checks are DISABLED. Anyone can mark payments as paid. Never run like this \
                 in production. 🚨️🚨️🚨️"
            );
        }
        Self { db, gateway, config, producers }
    }

    pub fn config(&self) -> &PaymentConfig {
        &self.config
    }
}

impl<B, G> PaymentApi<B, G>
where
    B: PaymentManagement + OrderManagement,
    G: PaymentGateway,
{
    /// Opens a payment for a customer's order with the gateway.
    ///
    /// The local payment record is saved before the intent is returned, so that a webhook that beats the customer's
    /// verification call can still be matched to the order.
    pub async fn create_payment_intent(&self, customer_id: i64, order_id: i64) -> Result<PaymentIntent, MarketplaceError> {
        let details = self.customer_order(customer_id, order_id).await?;
        let order = details.order;
        if details.payment.is_some() {
            return Err(MarketplaceError::AlreadyExists(format!("A payment for order {}", order.order_number)));
        }
        check_payable(&order)?;
        let request = GatewayOrderRequest {
            amount: order.total,
            currency: self.config.currency.clone(),
            receipt: order.order_number.clone(),
            notes: BTreeMap::from([
                ("order_id".to_string(), order.id.to_string()),
                ("customer_id".to_string(), order.customer_id.to_string()),
                ("vendor_id".to_string(), order.vendor_id.to_string()),
            ]),
        };
        trace!("💳️ Creating gateway order for {} ({})", order.order_number, order.total);
        let gateway_order = self.gateway.create_order(request).await.map_err(|e| {
            error!("💳️ Could not create a gateway order for {}. {e}", order.order_number);
            MarketplaceError::GatewayError(e.to_string())
        })?;
        let payment = self
            .db
            .insert_payment(NewPayment {
                order_id: order.id,
                gateway_order_id: gateway_order.id,
                amount: order.total,
                currency: self.config.currency.clone(),
            })
            .await?;
        info!("💳️ Payment #{} [{}] created for order {}", payment.id, payment.gateway_order_id, order.order_number);
        Ok(PaymentIntent {
            payment_id: payment.id,
            gateway_order_id: payment.gateway_order_id,
            key_id: self.gateway.key_id().to_string(),
            amount: payment.amount,
            currency: payment.currency,
            customer_phone: order.customer_phone,
            description: format!("Payment for Order {}", order.order_number),
        })
    }

    /// Checks the proof the customer submits after checkout and, if it holds, marks the payment successful.
    ///
    /// A bad signature marks the payment as failed and returns [`MarketplaceError::InvalidSignature`]. If the gateway
    /// cannot be reached to fetch the payment details, a [`MarketplaceError::GatewayError`] is returned and the payment
    /// is left as it was, so the call can be retried.
    pub async fn verify_payment(&self, customer_id: i64, proof: PaymentProof) -> Result<Payment, MarketplaceError> {
        let payment = self
            .db
            .fetch_payment(proof.payment_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Payment #{}", proof.payment_id)))?;
        let order = self
            .db
            .fetch_order(payment.order_id)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Order #{}", payment.order_id)))?
            .order;
        if order.customer_id != customer_id {
            warn!("💳️ Customer #{customer_id} tried to verify payment #{}, which is not theirs", payment.id);
            return Err(MarketplaceError::Unauthorized(format!("Payment #{} is not yours", payment.id)));
        }
        let secret = self.config.webhook_secret.reveal();
        if !verify_payment_signature(secret, &payment.gateway_order_id, &proof.gateway_payment_id, &proof.signature) {
            warn!("💳️ Invalid checkout signature for payment #{} [{}]", payment.id, payment.gateway_order_id);
            let update = PaymentUpdate::new(PaymentStatus::Failed).with_failure_reason(INVALID_SIGNATURE_REASON);
            let result = self.db.update_payment_status(&payment.gateway_order_id, update).await?;
            self.publish_if_changed(&result).await;
            return Err(MarketplaceError::InvalidSignature);
        }
        let gateway_payment = self.gateway.fetch_payment(&proof.gateway_payment_id).await.map_err(|e| {
            error!("💳️ Signature for payment #{} is valid, but fetching its details failed. {e}", payment.id);
            MarketplaceError::GatewayError(e.to_string())
        })?;
        let update = PaymentUpdate::new(PaymentStatus::Success)
            .with_gateway_payment_id(proof.gateway_payment_id)
            .with_signature(proof.signature)
            .with_method_details(gateway_payment.method_details());
        let result = self.db.update_payment_status(&payment.gateway_order_id, update).await?;
        self.publish_if_changed(&result).await;
        match result {
            PaymentUpdateResult::Ignored { payment, .. } => {
                warn!("💳️ Payment #{} is {} and cannot be marked as successful", payment.id, payment.status);
                Err(MarketplaceError::InvalidState(format!("Payment #{} is {}", payment.id, payment.status)))
            },
            result => {
                let payment = result.into_payment();
                info!("💳️ Payment #{} for order {} verified", payment.id, order.order_number);
                Ok(payment)
            },
        }
    }

    /// Consumes a gateway webhook.
    ///
    /// This never fails. The sender is an untrusted third party, so problems are logged and reported in the
    /// returned [`WebhookOutcome`] only. `body` must be the raw request body; the signature covers it byte for byte.
    pub async fn handle_webhook(&self, body: &[u8], signature: Option<&str>) -> WebhookOutcome {
        if self.config.webhook_checks {
            let valid = signature
                .map(|sig| verify_webhook_signature(self.config.webhook_secret.reveal(), body, sig))
                .unwrap_or(false);
            if !valid {
                warn!("🪝️ Dropping webhook with a missing or invalid signature");
                return WebhookOutcome::BadSignature;
            }
        }
        let webhook = match serde_json::from_slice::<WebhookBody>(body) {
            Ok(w) => w,
            Err(e) => {
                warn!("🪝️ Could not read webhook body. {e}");
                return WebhookOutcome::Malformed;
            },
        };
        let status = match webhook.event.as_str() {
            "payment.captured" => PaymentStatus::Success,
            "payment.failed" => PaymentStatus::Failed,
            "payment.authorized" => PaymentStatus::Pending,
            other => {
                info!("🪝️ Ignoring unhandled webhook event {other}");
                return WebhookOutcome::UnhandledEvent(other.to_string());
            },
        };
        let Some(entity) = webhook.payload.payment.map(|p| p.entity) else {
            warn!("🪝️ {} webhook has no payment entity", webhook.event);
            return WebhookOutcome::Malformed;
        };
        let Some(gateway_order_id) = entity.order_id.clone() else {
            warn!("🪝️ {} webhook for payment {} has no order id", webhook.event, entity.id);
            return WebhookOutcome::Malformed;
        };
        let mut update = PaymentUpdate::new(status).with_gateway_payment_id(entity.id).from_webhook();
        if entity.method.is_some() {
            update = update.with_method_details(PaymentMethodDetails { method: entity.method, ..Default::default() });
        }
        if status == PaymentStatus::Failed {
            let reason = entity.error_description.unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string());
            update = update.with_failure_reason(reason);
        }
        let result = match self.db.update_payment_status(&gateway_order_id, update).await {
            Ok(r) => r,
            Err(MarketplaceError::NotFound(_)) => {
                warn!("🪝️ {} webhook for unknown gateway order {gateway_order_id}. Dropping it", webhook.event);
                return WebhookOutcome::UnknownPayment(gateway_order_id);
            },
            Err(e) => {
                error!("🪝️ Could not apply {} webhook for gateway order {gateway_order_id}. {e}", webhook.event);
                return WebhookOutcome::StorageError(e.to_string());
            },
        };
        self.publish_if_changed(&result).await;
        let changed = matches!(result, PaymentUpdateResult::Updated { .. });
        match &result {
            PaymentUpdateResult::Updated { old_status, payment } => {
                info!("🪝️ Payment [{gateway_order_id}] moved from {old_status} to {}", payment.status)
            },
            PaymentUpdateResult::Unchanged(_) => debug!("🪝️ Payment [{gateway_order_id}] is already {status}"),
            PaymentUpdateResult::Ignored { payment, .. } => {
                debug!("🪝️ Payment [{gateway_order_id}] is {}. Ignoring move to {status}", payment.status)
            },
        }
        WebhookOutcome::Applied { gateway_order_id, status: result.payment().status, changed }
    }

    /// Refunds the full amount of a successful payment.
    pub async fn process_refund(&self, order_id: i64, reason: &str) -> Result<RefundResult, MarketplaceError> {
        let payment = self
            .db
            .fetch_payment_for_order(order_id)
            .await?
            .ok_or_else(|| MarketplaceError::InvalidState(format!("Order #{order_id} has no payment to refund")))?;
        match payment.status {
            PaymentStatus::Success => {},
            PaymentStatus::Refunded => return Err(MarketplaceError::AlreadyRefunded(order_id)),
            s => return Err(MarketplaceError::InvalidState(format!("Cannot refund a payment that is {s}"))),
        }
        let gateway_payment_id = payment.gateway_payment_id.clone().ok_or_else(|| {
            MarketplaceError::InvalidState(format!("Payment #{} has no gateway payment id", payment.id))
        })?;
        let request = GatewayRefundRequest {
            amount: payment.amount,
            speed: self.config.refund_speed.clone(),
            notes: BTreeMap::from([
                ("order_id".to_string(), order_id.to_string()),
                ("refund_reason".to_string(), reason.to_string()),
            ]),
        };
        let refund = self.gateway.refund_payment(&gateway_payment_id, request).await.map_err(|e| {
            error!("💳️ Refund for order #{order_id} failed at the gateway. {e}");
            MarketplaceError::GatewayError(e.to_string())
        })?;
        let old_status = payment.status;
        let payment = self
            .db
            .record_refund(order_id, RefundRecord { refund_id: refund.id.clone(), amount: payment.amount })
            .await?;
        info!("💳️ Refund {} of {} issued for order #{order_id}", refund.id, payment.amount);
        self.producers.publish_payment_status_changed(PaymentStatusChangedEvent::new(old_status, payment.clone())).await;
        Ok(RefundResult { refund_id: refund.id, amount: payment.amount, status: refund.status, reason: reason.to_string() })
    }

    pub async fn payment_for_order(&self, customer_id: i64, order_id: i64) -> Result<Payment, MarketplaceError> {
        self.customer_order(customer_id, order_id)
            .await?
            .payment
            .ok_or_else(|| MarketplaceError::NotFound(format!("Payment for order #{order_id}")))
    }

    async fn customer_order(
        &self,
        customer_id: i64,
        order_id: i64,
    ) -> Result<OrderDetails, MarketplaceError> {
        match self.db.fetch_order(order_id).await? {
            Some(details) if details.order.customer_id == customer_id => Ok(details),
            _ => Err(MarketplaceError::NotFound(format!("Order #{order_id}"))),
        }
    }

    async fn publish_if_changed(&self, result: &PaymentUpdateResult) {
        if let PaymentUpdateResult::Updated { old_status, payment } = result {
            let event = PaymentStatusChangedEvent::new(*old_status, payment.clone());
            self.producers.publish_payment_status_changed(event).await;
        }
    }
}

fn check_payable(order: &Order) -> Result<(), MarketplaceError> {
    if order.status != OrderStatusType::Pending {
        return Err(MarketplaceError::InvalidState(format!(
            "Order {} is {} and cannot be paid for",
            order.order_number, order.status
        )));
    }
    Ok(())
}
