use std::{collections::HashMap, str::FromStr};

use bazaar_engine::{
    db_types::{Money, Vendor},
    fees::FeeSchedule,
    events::EventProducers,
    payment_objects::{PaymentConfig, PaymentIntent, WebhookOutcome},
    test_utils::{
        mock_gateway::MockGateway,
        prepare_env::{create_database, random_db_path, run_migrations},
    },
    traits::data_objects::OrderDetails,
    CartApi,
    CatalogApi,
    MarketplaceError,
    OrderFlowApi,
    OrderManagement,
    PaymentApi,
    SqliteDatabase,
};
use cucumber::World;
use log::*;
use rust_decimal::Decimal;

pub const WEBHOOK_SECRET: &str = "whsec_cucumber";

#[derive(Default, Debug, World)]
pub struct BazaarWorld {
    pub system: Option<MarketplaceSystem>,
    pub vendors: HashMap<String, Vendor>,
    pub products: HashMap<String, i64>,
    pub last_error: Option<MarketplaceError>,
    pub order: Option<OrderDetails>,
    pub intent: Option<PaymentIntent>,
    pub webhook: Option<WebhookOutcome>,
    pub gateway_payment_id: Option<String>,
}

#[derive(Debug)]
pub struct MarketplaceSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub gateway: MockGateway,
    pub catalog: CatalogApi<SqliteDatabase>,
    pub carts: CartApi<SqliteDatabase>,
    pub orders: OrderFlowApi<SqliteDatabase, MockGateway>,
    pub payments: PaymentApi<SqliteDatabase, MockGateway>,
}

impl MarketplaceSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        create_database(&url).await;
        run_migrations(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 4).await.expect("Error creating connection to database");
        debug!("🚀️ Created database: {url}");
        let gateway = MockGateway::new();
        let fees = FeeSchedule::default();
        let producers = EventProducers::default();
        let payments =
            PaymentApi::new(db.clone(), gateway.clone(), PaymentConfig::new(WEBHOOK_SECRET), producers.clone());
        Self {
            db_path: url,
            catalog: CatalogApi::new(db.clone()),
            carts: CartApi::new(db.clone(), fees.clone()),
            orders: OrderFlowApi::new(db.clone(), payments.clone(), fees, producers),
            payments,
            gateway,
            db,
        }
    }
}

impl BazaarWorld {
    pub fn system(&self) -> &MarketplaceSystem {
        self.system.as_ref().expect("Marketplace not initialised")
    }

    pub fn vendor_id(&self, name: &str) -> i64 {
        self.vendors.get(name).unwrap_or_else(|| panic!("Unknown vendor {name}")).id
    }

    pub fn product_id(&self, name: &str) -> i64 {
        *self.products.get(name).unwrap_or_else(|| panic!("Unknown product {name}"))
    }

    pub fn order(&self) -> &OrderDetails {
        self.order.as_ref().expect("No order has been placed")
    }

    pub fn order_id(&self) -> i64 {
        self.order().order.id
    }

    /// Keeps the outcome of the last engine call, so that `Then` steps can check it.
    pub fn record<T>(&mut self, result: Result<T, MarketplaceError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.last_error = None;
                Some(v)
            },
            Err(e) => {
                debug!("🚀️ Call failed: {e}");
                self.last_error = Some(e);
                None
            },
        }
    }

    /// Re-reads the current order so that steps see the latest state.
    pub async fn refresh_order(&mut self) {
        let id = self.order_id();
        let details = self.system().db.fetch_order(id).await.expect("Error fetching order").expect("Order vanished");
        self.order = Some(details);
    }
}

pub fn money(s: &str) -> Money {
    let value = Decimal::from_str(s).unwrap_or_else(|_| panic!("{s} is not a number"));
    Money::try_from(value).expect("Invalid monetary value")
}

pub fn error_kind(e: &MarketplaceError) -> &'static str {
    match e {
        MarketplaceError::NotFound(_) => "NotFound",
        MarketplaceError::Unavailable(_) => "Unavailable",
        MarketplaceError::InsufficientStock { .. } => "InsufficientStock",
        MarketplaceError::VendorConflict { .. } => "VendorConflict",
        MarketplaceError::InvalidTransition { .. } => "InvalidTransition",
        MarketplaceError::InvalidState(_) => "InvalidState",
        MarketplaceError::InvalidSignature => "InvalidSignature",
        MarketplaceError::AlreadyExists(_) => "AlreadyExists",
        MarketplaceError::AlreadyRefunded(_) => "AlreadyRefunded",
        MarketplaceError::GatewayError(_) => "GatewayError",
        MarketplaceError::Unauthorized(_) => "Unauthorized",
        MarketplaceError::EmptyCart => "EmptyCart",
        MarketplaceError::ValidationError(_) => "ValidationError",
        MarketplaceError::DatabaseError(_) => "DatabaseError",
    }
}
