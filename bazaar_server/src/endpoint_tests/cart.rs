use actix_web::{http::StatusCode, test::TestRequest};
use serde_json::{json, Value};

use super::helpers::{as_customer, error_code, TestMarketplace};

const CUSTOMER: i64 = 7;

async fn add(market: &TestMarketplace, product_id: i64, quantity: i64) -> (StatusCode, Value) {
    let req = as_customer(TestRequest::post().uri("/api/cart/items"), CUSTOMER)
        .set_json(json!({"product_id": product_id, "quantity": quantity}));
    market.call(req).await
}

#[actix_web::test]
async fn fill_and_empty_a_cart() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Dosa Corner").await;
    let dosa = market.add_product(vendor, "Masala Dosa", 50, 10).await;
    let chai = market.add_product(vendor, "Chai", 15, 10).await;

    let (status, body) = market.call(as_customer(TestRequest::get().uri("/api/cart"), CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, body) = add(&market, dosa, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["vendor_id"], vendor);
    assert_eq!(body["item_count"], 2);
    assert_eq!(body["fees"], json!({"subtotal": "100.00", "platform_fee": "10.00", "delivery_fee": "12.00", "total": "122.00"}));

    let (status, body) = add(&market, chai, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 3);
    let items = body["items"].as_array().expect("Expected items");
    assert_eq!(items.len(), 2);
    let chai_item = items.iter().find(|i| i["product_id"] == chai).expect("Chai should be in the cart");
    let chai_item_id = chai_item["id"].as_i64().unwrap();

    let req = as_customer(TestRequest::put().uri(&format!("/api/cart/items/{chai_item_id}")), CUSTOMER)
        .set_json(json!({"quantity": 4}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 6);
    assert_eq!(body["fees"]["subtotal"], "160.00");
    assert_eq!(body["fees"]["platform_fee"], "16.00");

    let req = as_customer(TestRequest::delete().uri(&format!("/api/cart/items/{chai_item_id}")), CUSTOMER);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 2);
    let dosa_item_id = body["items"][0]["id"].as_i64().unwrap();

    // Removing the last item deletes the cart
    let req = as_customer(TestRequest::delete().uri(&format!("/api/cart/items/{dosa_item_id}")), CUSTOMER);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    market.tear_down().await;
}

#[actix_web::test]
async fn one_vendor_per_cart() {
    let market = TestMarketplace::new().await;
    let dosa_corner = market.add_vendor("Dosa Corner").await;
    let chaat_house = market.add_vendor("Chaat House").await;
    let dosa = market.add_product(dosa_corner, "Masala Dosa", 50, 10).await;
    let pani_puri = market.add_product(chaat_house, "Pani Puri", 40, 10).await;

    let (status, _) = add(&market, dosa, 1).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = add(&market, pani_puri, 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "VENDOR_CONFLICT");

    let req = as_customer(TestRequest::post().uri(&format!("/api/cart/switch_vendor/{chaat_house}")), CUSTOMER);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["vendor_id"], chaat_house);
    assert_eq!(body["item_count"], 0);
    assert_eq!(body["fees"]["total"], "0.00");

    let (status, body) = add(&market, pani_puri, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 2);
    market.tear_down().await;
}

#[actix_web::test]
async fn batch_adds_are_all_or_nothing() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Dosa Corner").await;
    let dosa = market.add_product(vendor, "Masala Dosa", 50, 10).await;
    let vada = market.add_product(vendor, "Medu Vada", 30, 1).await;

    let req = as_customer(TestRequest::post().uri("/api/cart/items/batch"), CUSTOMER).set_json(json!({"items": [
        {"product_id": dosa, "quantity": 2},
        {"product_id": vada, "quantity": 5}
    ]}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INSUFFICIENT_STOCK");
    let (_, body) = market.call(as_customer(TestRequest::get().uri("/api/cart"), CUSTOMER)).await;
    assert_eq!(body, Value::Null);

    let req = as_customer(TestRequest::post().uri("/api/cart/items/batch"), CUSTOMER).set_json(json!({"items": [
        {"product_id": dosa, "quantity": 2},
        {"product_id": vada, "quantity": 1}
    ]}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item_count"], 3);

    let (status, body) = market.call(as_customer(TestRequest::delete().uri("/api/cart"), CUSTOMER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (_, body) = market.call(as_customer(TestRequest::get().uri("/api/cart"), CUSTOMER)).await;
    assert_eq!(body, Value::Null);
    market.tear_down().await;
}

#[actix_web::test]
async fn missing_and_inactive_products() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Dosa Corner").await;
    let dosa = market.add_product(vendor, "Masala Dosa", 50, 10).await;

    let (status, body) = add(&market, 9999, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");

    let (status, body) = add(&market, dosa, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    market.tear_down().await;
}
