use bazaar_engine::events::{EventHandlers, EventHooks, OrderStatusChangedEvent, PaymentStatusChangedEvent};
use log::*;

pub const EVENT_BUFFER_SIZE: usize = 25;

/// Event handlers that write every committed status change to the log under the `bzr::events` target.
///
/// Notification delivery is out of scope for the server, but this is where a notifier would hook in.
pub fn create_event_log_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_order_status_changed(|ev| {
        let OrderStatusChangedEvent { old_status, order } = ev;
        Box::pin(async move {
            info!(
                target: "bzr::events",
                "📬️ Order {} [vendor #{}, customer #{}] moved from {old_status} to {}",
                order.order_number,
                order.vendor_id,
                order.customer_id,
                order.status
            );
        })
    });
    hooks.on_payment_status_changed(|ev| {
        let PaymentStatusChangedEvent { old_status, payment } = ev;
        Box::pin(async move {
            info!(
                target: "bzr::events",
                "📬️ Payment #{} for order #{} [{}] moved from {old_status} to {}",
                payment.id,
                payment.order_id,
                payment.gateway_order_id,
                payment.status
            );
        })
    });
    EventHandlers::new(EVENT_BUFFER_SIZE, hooks)
}
