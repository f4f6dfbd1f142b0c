use bazaar_engine::{db_types::CartLine, order_objects::CartSummary};
use cucumber::{then, when};

use crate::cucumber::{
    marketplace_world::{error_kind, money},
    BazaarWorld,
};

async fn cart_of(world: &BazaarWorld, customer: i64) -> Option<CartSummary> {
    world.system().carts.get_cart(customer).await.expect("Error fetching cart")
}

async fn item_id_in_cart_of(world: &BazaarWorld, customer: i64, product: &str) -> i64 {
    let product_id = world.product_id(product);
    let cart = cart_of(world, customer).await.unwrap_or_else(|| panic!("Customer {customer} has no cart"));
    cart.items
        .iter()
        .find(|i| i.product_id == product_id)
        .unwrap_or_else(|| panic!("{product} is not in the cart of customer {customer}"))
        .id
}

#[when(expr = "customer {int} adds {int} {string} to their cart")]
async fn add_item(world: &mut BazaarWorld, customer: i64, quantity: i64, product: String) {
    let product_id = world.product_id(&product);
    let result = world.system().carts.add_item(customer, product_id, quantity).await;
    world.record(result);
}

#[when(expr = "customer {int} adds {int} {string} and {int} {string} to their cart in one go")]
async fn add_two_items(world: &mut BazaarWorld, customer: i64, q1: i64, p1: String, q2: i64, p2: String) {
    let lines = [CartLine::new(world.product_id(&p1), q1), CartLine::new(world.product_id(&p2), q2)];
    let result = world.system().carts.add_multiple(customer, &lines).await;
    world.record(result);
}

#[when(expr = "customer {int} sets the quantity of {string} to {int}")]
async fn update_quantity(world: &mut BazaarWorld, customer: i64, product: String, quantity: i64) {
    let item_id = item_id_in_cart_of(world, customer, &product).await;
    let result = world.system().carts.update_item(customer, item_id, quantity).await;
    world.record(result);
}

#[when(expr = "customer {int} sets the quantity of {string} in the cart of customer {int} to {int}")]
async fn update_someone_elses_quantity(world: &mut BazaarWorld, customer: i64, product: String, owner: i64, quantity: i64) {
    let item_id = item_id_in_cart_of(world, owner, &product).await;
    let result = world.system().carts.update_item(customer, item_id, quantity).await;
    world.record(result);
}

#[when(expr = "customer {int} removes {string} from their cart")]
async fn remove_item(world: &mut BazaarWorld, customer: i64, product: String) {
    let item_id = item_id_in_cart_of(world, customer, &product).await;
    let result = world.system().carts.remove_item(customer, item_id).await;
    world.record(result);
}

#[when(expr = "customer {int} clears their cart")]
async fn clear_cart(world: &mut BazaarWorld, customer: i64) {
    let result = world.system().carts.clear(customer).await;
    world.record(result);
}

#[when(expr = "customer {int} switches their cart to {string}")]
async fn switch_vendor(world: &mut BazaarWorld, customer: i64, vendor: String) {
    let vendor_id = world.vendor_id(&vendor);
    let result = world.system().carts.switch_vendor(customer, vendor_id).await;
    world.record(result);
}

#[then("the last call succeeds")]
async fn last_call_succeeds(world: &mut BazaarWorld) {
    assert!(world.last_error.is_none(), "Expected success, but got {:?}", world.last_error);
}

#[then(expr = "the last call fails with {word}")]
async fn last_call_fails(world: &mut BazaarWorld, kind: String) {
    let err = world.last_error.as_ref().unwrap_or_else(|| panic!("Expected a {kind} error, but the call succeeded"));
    assert_eq!(error_kind(err), kind, "Unexpected error: {err}");
}

#[then(expr = "customer {int} has no cart")]
async fn no_cart(world: &mut BazaarWorld, customer: i64) {
    let cart = cart_of(world, customer).await;
    assert!(cart.is_none(), "Expected no cart, found {cart:?}");
}

#[then(expr = "the cart of customer {int} belongs to {string}")]
async fn cart_vendor(world: &mut BazaarWorld, customer: i64, vendor: String) {
    let cart = cart_of(world, customer).await.expect("No cart");
    assert_eq!(cart.cart.vendor_id, world.vendor_id(&vendor));
}

#[then(expr = "the cart of customer {int} holds {int} products")]
async fn cart_line_count(world: &mut BazaarWorld, customer: i64, count: usize) {
    let cart = cart_of(world, customer).await.expect("No cart");
    assert_eq!(cart.items.len(), count);
}

#[then(expr = "the cart of customer {int} contains {int} {string}")]
async fn cart_contains(world: &mut BazaarWorld, customer: i64, quantity: i64, product: String) {
    let product_id = world.product_id(&product);
    let cart = cart_of(world, customer).await.expect("No cart");
    let item = cart.items.iter().find(|i| i.product_id == product_id).unwrap_or_else(|| panic!("No {product} in cart"));
    assert_eq!(item.quantity, quantity);
    assert_eq!(item.product_name, product);
    assert!(cart.items.iter().all(|i| i.cart_id == cart.cart.id));
}

#[then(expr = "the cart totals of customer {int} are {word} + {word} + {word} = {word}")]
async fn cart_totals(world: &mut BazaarWorld, customer: i64, subtotal: String, platform: String, delivery: String, total: String) {
    let fees = cart_of(world, customer).await.expect("No cart").fees;
    assert_eq!(fees.subtotal, money(&subtotal), "subtotal");
    assert_eq!(fees.platform_fee, money(&platform), "platform fee");
    assert_eq!(fees.delivery_fee, money(&delivery), "delivery fee");
    assert_eq!(fees.total, money(&total), "total");
}
