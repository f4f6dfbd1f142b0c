use std::str::FromStr;

use bazaar_engine::{
    db_types::{DeliveryInfo, OrderStatusType, PaymentStatus, ProductUpdate},
    traits::data_objects::OrderDetails,
    MarketplaceError,
};
use cucumber::{then, when};

use crate::cucumber::{marketplace_world::money, BazaarWorld};

async fn checkout(world: &mut BazaarWorld, customer: i64, delivery: DeliveryInfo) {
    let result = world.system().orders.create_from_cart(customer, delivery).await;
    if let Some(details) = world.record(result) {
        world.order = Some(details);
    }
}

#[when(expr = "customer {int} checks out to {string} at {float}, {float}")]
async fn checkout_at(world: &mut BazaarWorld, customer: i64, address: String, lat: f64, lon: f64) {
    let delivery = DeliveryInfo::new(address).with_location(lat, lon).with_phone("+919800000000");
    checkout(world, customer, delivery).await;
}

#[when(expr = "customer {int} checks out to {string}")]
async fn checkout_anywhere(world: &mut BazaarWorld, customer: i64, address: String) {
    checkout(world, customer, DeliveryInfo::new(address)).await;
}

#[when(expr = "{string} changes the price of {string} to {word}")]
async fn change_price(world: &mut BazaarWorld, vendor: String, product: String, price: String) {
    let vendor_id = world.vendor_id(&vendor);
    let product_id = world.product_id(&product);
    let update = ProductUpdate::default().with_price(money(&price)).with_name(format!("New {product}"));
    let result = world.system().catalog.update_product(vendor_id, product_id, update).await;
    world.record(result);
}

async fn record_transition(world: &mut BazaarWorld, result: Result<OrderDetails, MarketplaceError>) {
    if world.record(result).is_some() {
        world.refresh_order().await;
    }
}

#[when(expr = "{string} accepts the order with an estimate of {int} minutes")]
async fn accept_with_eta(world: &mut BazaarWorld, vendor: String, minutes: i64) {
    let (vendor_id, order_id) = (world.vendor_id(&vendor), world.order_id());
    let result = world.system().orders.accept_order(vendor_id, order_id, Some(minutes)).await;
    record_transition(world, result).await;
}

#[when(expr = "{string} accepts the order")]
async fn accept(world: &mut BazaarWorld, vendor: String) {
    let (vendor_id, order_id) = (world.vendor_id(&vendor), world.order_id());
    let result = world.system().orders.accept_order(vendor_id, order_id, None).await;
    record_transition(world, result).await;
}

#[when(expr = "{string} rejects the order because {string}")]
async fn reject(world: &mut BazaarWorld, vendor: String, reason: String) {
    let (vendor_id, order_id) = (world.vendor_id(&vendor), world.order_id());
    let result = world.system().orders.reject_order(vendor_id, order_id, Some(reason)).await;
    record_transition(world, result).await;
}

#[when(expr = "{string} moves the order to {word}")]
async fn move_order(world: &mut BazaarWorld, vendor: String, status: String) {
    let status = OrderStatusType::from_str(&status).expect("Invalid order status");
    let (vendor_id, order_id) = (world.vendor_id(&vendor), world.order_id());
    let result = world.system().orders.update_status(vendor_id, order_id, status, None).await;
    record_transition(world, result).await;
}

#[when(expr = "customer {int} cancels the order")]
async fn cancel(world: &mut BazaarWorld, customer: i64) {
    let order_id = world.order_id();
    let result = world.system().orders.cancel_order(customer, order_id, Some("Changed my mind".into())).await;
    record_transition(world, result).await;
}

#[when(expr = "customer {int} looks up the order")]
async fn look_up_order(world: &mut BazaarWorld, customer: i64) {
    let order_id = world.order_id();
    let result = world.system().orders.order_for_customer(customer, order_id).await;
    world.record(result);
}

#[then(expr = "the order totals are {word} + {word} + {word} = {word}")]
async fn order_totals(world: &mut BazaarWorld, subtotal: String, platform: String, delivery: String, total: String) {
    let details = world.order();
    let order = &details.order;
    assert_eq!(order.subtotal, money(&subtotal), "subtotal");
    assert_eq!(order.platform_fee, money(&platform), "platform fee");
    assert_eq!(order.delivery_fee, money(&delivery), "delivery fee");
    assert_eq!(order.total, money(&total), "total");
    assert_eq!(details.items_total(), order.subtotal);
    assert_eq!(order.subtotal + order.platform_fee + order.delivery_fee, order.total);
}

#[then(expr = "the order status is {word}")]
async fn order_status(world: &mut BazaarWorld, status: String) {
    world.refresh_order().await;
    let expected = OrderStatusType::from_str(&status).expect("Invalid order status");
    assert_eq!(world.order().order.status, expected);
}

#[then(expr = "the order payment status is {word}")]
async fn order_payment_status(world: &mut BazaarWorld, status: String) {
    world.refresh_order().await;
    let expected = PaymentStatus::from_str(&status).expect("Invalid payment status");
    assert_eq!(world.order().order.payment_status, expected);
}

#[then(expr = "the order number starts with {string}")]
async fn order_number_prefix(world: &mut BazaarWorld, prefix: String) {
    let number = &world.order().order.order_number;
    assert!(number.starts_with(&prefix), "Order number was {number}");
    assert_eq!(number.len(), prefix.len() + 15, "Order number was {number}");
}

#[then(expr = "the order has {int} {string} at {word} each")]
async fn order_item(world: &mut BazaarWorld, quantity: i64, product: String, price: String) {
    world.refresh_order().await;
    let item = world
        .order()
        .items
        .iter()
        .find(|i| i.product_name == product)
        .unwrap_or_else(|| panic!("No {product} in the order"));
    assert_eq!(item.quantity, quantity);
    assert_eq!(item.price_at_time, money(&price));
    assert_eq!(item.line_total, item.price_at_time * quantity);
    assert_eq!(item.product_description.as_deref(), Some(format!("Freshly made {product}").as_str()));
}

#[then(expr = "{string} has {int} in stock")]
async fn stock_level(world: &mut BazaarWorld, product: String, stock: i64) {
    let id = world.product_id(&product);
    let p = world.system().catalog.fetch_product(id).await.expect("Error fetching product");
    assert_eq!(p.stock, stock, "Stock for {product}");
}

#[then("the order has an estimated delivery time")]
async fn has_eta(world: &mut BazaarWorld) {
    world.refresh_order().await;
    let order = &world.order().order;
    let accepted = order.accepted_at.expect("accepted_at is not set");
    let eta = order.estimated_delivery_at.expect("estimated_delivery_at is not set");
    assert!(eta > accepted, "ETA {eta} is not after {accepted}");
}

#[then(expr = "the order rejection reason is {string}")]
async fn rejection_reason(world: &mut BazaarWorld, reason: String) {
    world.refresh_order().await;
    let order = &world.order().order;
    assert!(order.rejected_at.is_some());
    assert_eq!(order.rejection_reason.as_deref(), Some(reason.as_str()));
}

#[then("the order was cancelled by the customer")]
async fn cancellation_recorded(world: &mut BazaarWorld) {
    world.refresh_order().await;
    let order = &world.order().order;
    assert!(order.cancelled_at.is_some());
    assert_eq!(order.cancellation_reason.as_deref(), Some("Changed my mind"));
}

#[then("the order was delivered")]
async fn delivered(world: &mut BazaarWorld) {
    world.refresh_order().await;
    assert!(world.order().order.delivered_at.is_some());
}

#[then(expr = "customer {int} has {int} orders")]
async fn customer_orders(world: &mut BazaarWorld, customer: i64, count: usize) {
    let orders = world.system().orders.orders_for_customer(customer, None).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
    assert!(orders.iter().all(|o| o.order.customer_id == customer));
}

#[then(expr = "{string} has {int} {word} orders")]
async fn vendor_orders(world: &mut BazaarWorld, vendor: String, count: usize, status: String) {
    let status = OrderStatusType::from_str(&status).expect("Invalid order status");
    let vendor_id = world.vendor_id(&vendor);
    let orders = world.system().orders.orders_for_vendor(vendor_id, Some(status)).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
    assert!(orders.iter().all(|o| o.order.vendor_id == vendor_id && o.order.status == status));
}
