use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use bazaar_engine::{traits::MarketplaceError, CatalogApi};
use serde_json::{json, Value};

use super::{
    helpers::{as_vendor, error_code, TestMarketplace},
    mocks::MockCatalog,
};
use crate::{
    routes::VendorProductRoute,
    server::{json_config, path_config, query_config},
};

#[actix_web::test]
async fn manage_products() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Dosa Corner").await;

    let req = as_vendor(TestRequest::post().uri("/api/vendor/products"), vendor)
        .set_json(json!({"name": "Masala Dosa", "description": "With chutney", "price": "80.00", "stock": 12}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["vendor_id"], vendor);
    assert_eq!(body["price"], "80.00");
    assert_eq!(body["active"], true);
    let product_id = body["id"].as_i64().unwrap();
    market.add_product(vendor, "Onion Uttapam", 90, 5).await;

    let req = as_vendor(TestRequest::put().uri(&format!("/api/vendor/products/{product_id}")), vendor)
        .set_json(json!({"price": "85.50"}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "85.50");
    assert_eq!(body["name"], "Masala Dosa");

    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/products/{product_id}/stock")), vendor)
        .set_json(json!({"stock": 40}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 40);

    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/products/{product_id}/toggle")), vendor);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (status, body) = market.call(as_vendor(TestRequest::get().uri("/api/vendor/products"), vendor)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let (status, body) = market.call(as_vendor(TestRequest::get().uri("/api/vendor/products?q=DOSA"), vendor)).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().expect("Expected an array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], product_id);

    let req = as_vendor(TestRequest::get().uri(&format!("/api/vendor/products/{product_id}")), vendor);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 40);
    assert_eq!(body["active"], false);
    market.tear_down().await;
}

#[actix_web::test]
async fn vendors_only_see_their_own_products() {
    let market = TestMarketplace::new().await;
    let dosa_corner = market.add_vendor("Dosa Corner").await;
    let chaat_house = market.add_vendor("Chaat House").await;
    let dosa = market.add_product(dosa_corner, "Masala Dosa", 50, 10).await;

    let req = as_vendor(TestRequest::get().uri(&format!("/api/vendor/products/{dosa}")), chaat_house);
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "FORBIDDEN");

    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/products/{dosa}/stock")), chaat_house)
        .set_json(json!({"stock": 0}));
    let (status, _) = market.call(req).await;
    assert!(status.is_client_error(), "Expected a client error, got {status}");

    let (_, body) = market.call(as_vendor(TestRequest::get().uri("/api/vendor/products"), chaat_house)).await;
    assert_eq!(body, json!([]));
    market.tear_down().await;
}

#[actix_web::test]
async fn invalid_products_are_rejected() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Dosa Corner").await;
    let req = as_vendor(TestRequest::post().uri("/api/vendor/products"), vendor)
        .set_json(json!({"name": "   ", "price": "80.00", "stock": 1}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");

    // Sub-paisa prices cannot be represented
    let req = as_vendor(TestRequest::post().uri("/api/vendor/products"), vendor)
        .set_json(json!({"name": "Idli", "price": "10.005", "stock": 1}));
    let (status, body) = market.call(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");
    market.tear_down().await;
}

#[actix_web::test]
async fn storage_failures_are_server_errors() {
    let _ = env_logger::try_init();
    let mut catalog = MockCatalog::new();
    catalog
        .expect_fetch_product()
        .withf(|id| *id == 5)
        .returning(|_| Err(MarketplaceError::DatabaseError("disk I/O error".into())));
    let app = App::new()
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .app_data(web::Data::new(CatalogApi::new(catalog)))
        .service(VendorProductRoute::<MockCatalog>::new());
    let service = test::init_service(app).await;
    let req = as_vendor(TestRequest::get().uri("/vendor/products/5"), 3).to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert_eq!(body["error"], "Database error: disk I/O error");
}

#[actix_web::test]
async fn customers_browse_the_storefront() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Dosa Corner").await;
    let masala = market.add_product(vendor, "Masala Dosa", 50, 10).await;
    let rava = market.add_product(vendor, "Rava Dosa", 60, 10).await;
    let vada = market.add_product(vendor, "Medu Vada", 30, 10).await;
    let req = as_vendor(TestRequest::post().uri(&format!("/api/vendor/products/{rava}/toggle")), vendor);
    let (status, _) = market.call(req).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = market.call(TestRequest::get().uri(&format!("/api/vendors/{vendor}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["shop_name"], "Dosa Corner");

    // Withdrawn products are not listed
    let (status, body) = market.call(TestRequest::get().uri(&format!("/api/vendors/{vendor}/products"))).await;
    assert_eq!(status, StatusCode::OK);
    let mut ids = body.as_array().expect("Expected an array").iter().map(|p| p["id"].as_i64().unwrap()).collect::<Vec<_>>();
    ids.sort();
    assert_eq!(ids, vec![masala, vada]);

    let (status, body) = market.call(TestRequest::get().uri(&format!("/api/vendors/{vendor}/products?q=dosa"))).await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().expect("Expected an array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], masala);

    let (status, body) = market.call(TestRequest::get().uri(&format!("/api/products/{masala}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Masala Dosa");
    assert_eq!(body["price"], "50.00");

    let (status, body) = market.call(TestRequest::get().uri(&format!("/api/products/{rava}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNAVAILABLE");

    let (status, body) = market.call(TestRequest::get().uri("/api/products/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
    let (status, body) = market.call(TestRequest::get().uri("/api/vendors/9999/products")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NOT_FOUND");
    market.tear_down().await;
}

#[actix_web::test]
async fn closed_vendors_are_unavailable() {
    let market = TestMarketplace::new().await;
    let vendor = market.add_vendor("Monsoon Cafe").await;
    let chai = market.add_product(vendor, "Cutting Chai", 15, 50).await;
    sqlx::query("UPDATE vendors SET active = 0 WHERE id = $1").bind(vendor).execute(market.db.pool()).await.unwrap();

    for uri in [format!("/api/vendors/{vendor}"), format!("/api/vendors/{vendor}/products"), format!("/api/products/{chai}")] {
        let (status, body) = market.call(TestRequest::get().uri(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(error_code(&body), "UNAVAILABLE", "{uri}");
    }
    market.tear_down().await;
}
