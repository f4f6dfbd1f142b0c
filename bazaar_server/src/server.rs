use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer, Scope};
use bazaar_engine::{
    events::EventProducers,
    CartApi,
    CatalogApi,
    OrderFlowApi,
    PaymentApi,
    PaymentGateway,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::{event_log::create_event_log_handlers, razorpay::RazorpayGateway},
    routes::{
        health,
        order_statuses,
        AcceptOrderRoute,
        AddCartItemRoute,
        AddCartItemsRoute,
        CancelMyOrderRoute,
        CheckoutRoute,
        ClearCartRoute,
        CreateProductRoute,
        MarketplaceBackend,
        MyCartRoute,
        MyOrderPaymentRoute,
        MyOrderRoute,
        MyOrdersRoute,
        PaymentIntentRoute,
        RazorpayWebhookRoute,
        RejectOrderRoute,
        RemoveCartItemRoute,
        StorefrontProductRoute,
        StorefrontProductsRoute,
        StorefrontVendorRoute,
        SwitchCartVendorRoute,
        ToggleProductRoute,
        UpdateCartItemRoute,
        UpdateOrderStatusRoute,
        UpdateProductRoute,
        UpdateProductStockRoute,
        VendorOrderRoute,
        VendorOrdersRoute,
        VendorProductRoute,
        VendorProductsRoute,
        VerifyPaymentRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_migrations(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Connected to database at {}", db.url());
    let gateway =
        RazorpayGateway::new(config.razorpay.clone()).map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let handlers = create_event_log_handlers();
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<B, G>(
    config: ServerConfig,
    db: B,
    gateway: G,
    producers: EventProducers,
) -> Result<Server, ServerError>
where
    B: MarketplaceBackend + Send + 'static,
    G: PaymentGateway + Send + 'static,
{
    let payments_api = PaymentApi::new(db.clone(), gateway, config.payments.clone(), producers.clone());
    let options = ServerOptions::from_config(&config);
    let fees = config.fees.clone();
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone());
        let cart_api = CartApi::new(db.clone(), fees.clone());
        let orders_api = OrderFlowApi::new(db.clone(), payments_api.clone(), fees.clone(), producers.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bzr::access_log"))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(cart_api))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(payments_api.clone()))
            .app_data(web::Data::new(options.clone()))
            .service(health)
            .service(api_scope::<B, G>())
            .service(webhook_scope::<B, G>())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Every customer and vendor route. Apart from the storefront, callers identify themselves with the identity headers
/// (see [`crate::auth`]).
pub fn api_scope<B, G>() -> Scope
where
    B: MarketplaceBackend + 'static,
    G: PaymentGateway + 'static,
{
    web::scope("/api")
        .service(order_statuses)
        // Storefront
        .service(StorefrontVendorRoute::<B>::new())
        .service(StorefrontProductsRoute::<B>::new())
        .service(StorefrontProductRoute::<B>::new())
        // Cart
        .service(MyCartRoute::<B>::new())
        .service(AddCartItemsRoute::<B>::new())
        .service(AddCartItemRoute::<B>::new())
        .service(UpdateCartItemRoute::<B>::new())
        .service(RemoveCartItemRoute::<B>::new())
        .service(ClearCartRoute::<B>::new())
        .service(SwitchCartVendorRoute::<B>::new())
        // Customer orders
        .service(CheckoutRoute::<B, G>::new())
        .service(MyOrdersRoute::<B, G>::new())
        .service(MyOrderRoute::<B, G>::new())
        .service(CancelMyOrderRoute::<B, G>::new())
        .service(MyOrderPaymentRoute::<B, G>::new())
        // Vendor orders
        .service(VendorOrdersRoute::<B, G>::new())
        .service(VendorOrderRoute::<B, G>::new())
        .service(AcceptOrderRoute::<B, G>::new())
        .service(RejectOrderRoute::<B, G>::new())
        .service(UpdateOrderStatusRoute::<B, G>::new())
        // Vendor catalog
        .service(VendorProductsRoute::<B>::new())
        .service(CreateProductRoute::<B>::new())
        .service(VendorProductRoute::<B>::new())
        .service(UpdateProductRoute::<B>::new())
        .service(UpdateProductStockRoute::<B>::new())
        .service(ToggleProductRoute::<B>::new())
        // Payments
        .service(PaymentIntentRoute::<B, G>::new())
        .service(VerifyPaymentRoute::<B, G>::new())
}

/// Gateway callbacks. These carry no identity header; they are authenticated by their signature.
pub fn webhook_scope<B, G>() -> Scope
where
    B: MarketplaceBackend + 'static,
    G: PaymentGateway + 'static,
{
    web::scope("/webhook").service(RazorpayWebhookRoute::<B, G>::new())
}

//----------------------------------------------   Extractor errors  ----------------------------------------------
// Malformed bodies, queries and paths are reported in the same JSON shape as every other error.

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ServerError::InvalidRequest(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ServerError::InvalidRequest(err.to_string()).into())
}
