use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, OrderStatusChangedEvent, PaymentStatusChangedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_status_producer: Vec<EventProducer<OrderStatusChangedEvent>>,
    pub payment_status_producer: Vec<EventProducer<PaymentStatusChangedEvent>>,
}

impl EventProducers {
    pub async fn publish_order_status_changed(&self, event: OrderStatusChangedEvent) {
        for producer in &self.order_status_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_payment_status_changed(&self, event: PaymentStatusChangedEvent) {
        for producer in &self.payment_status_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_order_status_changed: Option<EventHandler<OrderStatusChangedEvent>>,
    pub on_payment_status_changed: Option<EventHandler<PaymentStatusChangedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_status_changed = hooks.on_order_status_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_payment_status_changed = hooks.on_payment_status_changed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_status_changed, on_payment_status_changed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_status_changed {
            result.order_status_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_payment_status_changed {
            result.payment_status_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_order_status_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_payment_status_changed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_status_changed: Option<Handler<OrderStatusChangedEvent>>,
    pub on_payment_status_changed: Option<Handler<PaymentStatusChangedEvent>>,
}

impl EventHooks {
    pub fn on_order_status_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderStatusChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_status_changed = Some(Arc::new(f));
        self
    }

    pub fn on_payment_status_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PaymentStatusChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payment_status_changed = Some(Arc::new(f));
        self
    }
}
