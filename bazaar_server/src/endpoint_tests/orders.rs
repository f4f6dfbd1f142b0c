use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::{json, Value};

use super::helpers::{as_customer, as_vendor, error_code, TestMarketplace};

const CUSTOMER: i64 = 21;

/// Fills the customer's cart with two 50.00 dosas and checks out. Returns the vendor, product and order ids.
async fn place_order(market: &TestMarketplace) -> (i64, i64, i64) {
    let vendor = market.add_vendor("Dosa Corner").await;
    let dosa = market.add_product(vendor, "Masala Dosa", 50, 10).await;
    let req = as_customer(TestRequest::post().uri("/api/cart/items"), CUSTOMER)
        .set_json(json!({"product_id": dosa, "quantity": 2}));
    let (status, _) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    let req = as_customer(TestRequest::post().uri("/api/orders"), CUSTOMER)
        .set_json(json!({"address": "12 MG Road, Bengaluru", "customer_phone": "+919900011122"}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::CREATED, "Checkout failed: {body}");
    let order_id = body["order"]["id"].as_i64().expect("Order has no id");
    (vendor, dosa, order_id)
}

async fn stock_of(market: &TestMarketplace, vendor: i64, product: i64) -> i64 {
    let req = as_vendor(TestRequest::get().uri(&format!("/api/vendor/products/{product}")), vendor);
    let (_, body) = market.call(req).await;
    body["stock"].as_i64().expect("Product has no stock")
}

#[actix_web::test]
async fn checkout_creates_a_pending_order() {
    let market = TestMarketplace::new().await;
    let (vendor, dosa, order_id) = place_order(&market).await;

    let (status, body) = market.call(as_customer(TestRequest::get().uri(&format!("/api/orders/{order_id}")), CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    let order = &body["order"];
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["payment_status"], "CREATED");
    assert_eq!(order["vendor_id"], vendor);
    assert_eq!(order["subtotal"], "100.00");
    assert_eq!(order["platform_fee"], "10.00");
    assert_eq!(order["delivery_fee"], "12.00");
    assert_eq!(order["total"], "122.00");
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD"));
    assert_eq!(body["items"][0]["product_name"], "Masala Dosa");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["payment"], Value::Null);

    // Stock is reserved and the cart is gone
    assert_eq!(stock_of(&market, vendor, dosa).await, 8);
    let (_, body) = market.call(as_customer(TestRequest::get().uri("/api/cart"), CUSTOMER)).await;
    assert_eq!(body, Value::Null);

    // Nothing left to check out
    let req = as_customer(TestRequest::post().uri("/api/orders"), CUSTOMER).set_json(json!({"address": "12 MG Road"}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "EMPTY_CART");
    market.tear_down().await;
}

#[actix_web::test]
async fn list_orders_by_status() {
    let market = TestMarketplace::new().await;
    let (vendor, _, order_id) = place_order(&market).await;

    let (status, body) = market.call(as_customer(TestRequest::get().uri("/api/orders"), CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    let (_, body) = market.call(as_customer(TestRequest::get().uri("/api/orders?status=PENDING"), CUSTOMER)).await;
    assert_eq!(body[0]["order"]["id"], order_id);
    let (_, body) = market.call(as_customer(TestRequest::get().uri("/api/orders?status=DELIVERED"), CUSTOMER)).await;
    assert_eq!(body, json!([]));

    let (status, body) = market.call(as_vendor(TestRequest::get().uri("/api/vendor/orders?status=PENDING"), vendor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    // Other customers and vendors see nothing
    let (_, body) = market.call(as_customer(TestRequest::get().uri("/api/orders"), CUSTOMER + 1)).await;
    assert_eq!(body, json!([]));
    let (_, body) = market.call(as_vendor(TestRequest::get().uri("/api/vendor/orders"), vendor + 1)).await;
    assert_eq!(body, json!([]));
    let req = as_customer(TestRequest::get().uri(&format!("/api/orders/{order_id}")), CUSTOMER + 1);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
    market.tear_down().await;
}

#[actix_web::test]
async fn vendor_drives_the_order_to_delivery() {
    let market = TestMarketplace::new().await;
    let (vendor, _, order_id) = place_order(&market).await;

    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/accept")), vendor)
        .set_json(json!({"estimated_minutes": 30}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "ACCEPTED");
    assert!(body["order"]["accepted_at"].is_string());
    assert!(body["order"]["estimated_delivery_at"].is_string());

    // Skipping IN_PROGRESS is not allowed
    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/status")), vendor)
        .set_json(json!({"status": "READY"}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "INVALID_TRANSITION");

    for next in ["IN_PROGRESS", "READY", "OUT_FOR_DELIVERY", "DELIVERED"] {
        let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/status")), vendor)
            .set_json(json!({"status": next}));
        let (status, body) = market.call(req).await;
        assert_eq!(status, StatusCode::OK, "Could not move to {next}: {body}");
        assert_eq!(body["order"]["status"], next);
    }
    let req = as_vendor(TestRequest::get().uri(&format!("/api/vendor/orders/{order_id}")), vendor);
    let (_, body) = market.call(req).await;
    assert!(body["order"]["delivered_at"].is_string());
    market.tear_down().await;
}

#[actix_web::test]
async fn only_the_owning_vendor_may_act() {
    let market = TestMarketplace::new().await;
    let (vendor, _, order_id) = place_order(&market).await;
    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/accept")), vendor + 1);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");
    let req = as_vendor(TestRequest::get().uri(&format!("/api/vendor/orders/{order_id}")), vendor + 1);
    let (status, _) = market.call(req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    market.tear_down().await;
}

#[actix_web::test]
async fn rejection_restores_stock() {
    let market = TestMarketplace::new().await;
    let (vendor, dosa, order_id) = place_order(&market).await;
    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/reject")), vendor)
        .set_json(json!({"reason": "Out of batter"}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "REJECTED");
    assert_eq!(body["order"]["rejection_reason"], "Out of batter");
    assert_eq!(stock_of(&market, vendor, dosa).await, 10);
    market.tear_down().await;
}

#[actix_web::test]
async fn customers_cancel_until_preparation_starts() {
    let market = TestMarketplace::new().await;
    let (vendor, dosa, order_id) = place_order(&market).await;
    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/accept")), vendor);
    let (status, _) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);

    // No body at all is fine
    let req = as_customer(TestRequest::post().uri(&format!("/api/orders/{order_id}/cancel")), CUSTOMER);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "CANCELLED");
    assert_eq!(stock_of(&market, vendor, dosa).await, 10);

    let req = as_customer(TestRequest::post().uri(&format!("/api/orders/{order_id}/cancel")), CUSTOMER)
        .set_json(json!({"reason": "Again"}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "INVALID_TRANSITION");
    market.tear_down().await;
}

#[actix_web::test]
async fn customers_cannot_cancel_orders_in_progress() {
    let market = TestMarketplace::new().await;
    let (vendor, _, order_id) = place_order(&market).await;
    for next in ["ACCEPTED", "IN_PROGRESS"] {
        let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/orders/{order_id}/status")), vendor)
            .set_json(json!({"status": next}));
        let (status, _) = market.call(req).await;
        assert_eq!(status, StatusCode::OK);
    }
    let req = as_customer(TestRequest::post().uri(&format!("/api/orders/{order_id}/cancel")), CUSTOMER);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_STATE");
    market.tear_down().await;
}
