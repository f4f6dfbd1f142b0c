use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use bazaar_engine::{
    db_types::{Money, NewProduct, NewVendor},
    events::EventProducers,
    fees::FeeSchedule,
    payment_objects::PaymentConfig,
    test_utils::{
        mock_gateway::MockGateway,
        prepare_env::{drop_database, prepare_test_env, random_db_path},
    },
    CartApi,
    CatalogApi,
    OrderFlowApi,
    PaymentApi,
    SqliteDatabase,
};
use log::debug;
use serde_json::Value;

use crate::{
    auth::{CUSTOMER_ID_HEADER, VENDOR_ID_HEADER},
    config::{ServerOptions, DEFAULT_WEBHOOK_SIGNATURE_HEADER},
    routes::health,
    server::{api_scope, json_config, path_config, query_config, webhook_scope},
};

pub const WEBHOOK_SECRET: &str = "endpoint-tests-webhook-secret";

/// A real SQLite marketplace behind the full route table, with the gateway mocked out.
pub struct TestMarketplace {
    pub db: SqliteDatabase,
    pub gateway: MockGateway,
}

impl TestMarketplace {
    pub async fn new() -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        Self { db, gateway: MockGateway::new() }
    }

    pub async fn tear_down(mut self) {
        let url = self.db.url().to_string();
        self.db.close().await.expect("Error closing database");
        drop_database(&url).await;
    }

    pub async fn add_vendor(&self, name: &str) -> i64 {
        CatalogApi::new(self.db.clone()).register_vendor(NewVendor::new(name)).await.expect("Error adding vendor").id
    }

    pub async fn add_product(&self, vendor_id: i64, name: &str, rupees: i64, stock: i64) -> i64 {
        let product = NewProduct::new(name, Money::from_rupees(rupees), stock);
        CatalogApi::new(self.db.clone()).create_product(vendor_id, product).await.expect("Error adding product").id
    }

    /// Sends a request through a freshly built app and returns the status and the raw body.
    pub async fn call_raw(&self, req: TestRequest) -> (StatusCode, String) {
        let payments = PaymentApi::new(
            self.db.clone(),
            self.gateway.clone(),
            PaymentConfig::new(WEBHOOK_SECRET),
            EventProducers::default(),
        );
        let orders = OrderFlowApi::new(self.db.clone(), payments.clone(), FeeSchedule::default(), EventProducers::default());
        let options = ServerOptions { webhook_signature_header: DEFAULT_WEBHOOK_SIGNATURE_HEADER.to_string() };
        let app = App::new()
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::Data::new(CatalogApi::new(self.db.clone())))
            .app_data(web::Data::new(CartApi::new(self.db.clone(), FeeSchedule::default())))
            .app_data(web::Data::new(orders))
            .app_data(web::Data::new(payments))
            .app_data(web::Data::new(options))
            .service(health)
            .service(api_scope::<SqliteDatabase, MockGateway>())
            .service(webhook_scope::<SqliteDatabase, MockGateway>());
        let service = test::init_service(app).await;
        let res = test::call_service(&service, req.to_request()).await;
        let status = res.status();
        let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
        debug!("Response: {status} {body}");
        (status, body)
    }

    /// As [`call_raw`](Self::call_raw), with the body parsed as JSON.
    pub async fn call(&self, req: TestRequest) -> (StatusCode, Value) {
        let (status, body) = self.call_raw(req).await;
        let json = serde_json::from_str(&body).unwrap_or_else(|e| panic!("Response was not JSON ({e}): {body}"));
        (status, json)
    }
}

pub fn as_customer(req: TestRequest, customer_id: i64) -> TestRequest {
    req.insert_header((CUSTOMER_ID_HEADER, customer_id.to_string()))
}

pub fn as_vendor(req: TestRequest, vendor_id: i64) -> TestRequest {
    req.insert_header((VENDOR_ID_HEADER, vendor_id.to_string()))
}

pub fn error_code(body: &Value) -> &str {
    body["code"].as_str().unwrap_or_default()
}
