//! Request handler definitions
//!
//! Define each route and its handler here. Handlers only translate between HTTP and the engine APIs; anything more
//! than that belongs in the engine.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every engine call is async, so keep it that way: no blocking I/O in
//! handlers.
//!
//! Customer routes read the caller from the `X-Bzr-Customer-Id` header and vendor routes from `X-Bzr-Vendor-Id`
//! (see [`crate::auth`]).
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use bazaar_engine::{
    db_types::{CartLine, DeliveryInfo, NewProduct, OrderStatusType, ProductUpdate},
    order_objects::OrderListQuery,
    payment_objects::{PaymentProof, WebhookOutcome},
    traits::{CartManagement, CatalogManagement, OrderManagement, PaymentGateway, PaymentManagement},
    CartApi,
    CatalogApi,
    OrderFlowApi,
    PaymentApi,
};
use log::*;

use crate::{
    auth::{CustomerId, VendorId},
    config::ServerOptions,
    data_objects::{
        AcceptOrderRequest,
        AddItemRequest,
        AddItemsRequest,
        JsonResponse,
        PaymentIntentRequest,
        ProductSearch,
        QuantityUpdate,
        ReasonRequest,
        StatusUpdateRequest,
        StockUpdate,
    },
    errors::ServerError,
};

/// Everything the order and payment routes need from a storage backend.
pub trait MarketplaceBackend: CatalogManagement + CartManagement + OrderManagement + PaymentManagement {}

impl<T> MarketplaceBackend for T where T: CatalogManagement + CartManagement + OrderManagement + PaymentManagement {}

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(my_cart => Get "/cart" impl CartManagement);
/// Returns the caller's cart with its items and fee breakdown, or `null` if they have no cart.
pub async fn my_cart<B: CartManagement>(
    customer: CustomerId,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET cart for customer #{}", customer.0);
    let cart = api.get_cart(customer.0).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(add_cart_item => Post "/cart/items" impl CartManagement);
pub async fn add_cart_item<B: CartManagement>(
    customer: CustomerId,
    body: web::Json<AddItemRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let AddItemRequest { product_id, quantity } = body.into_inner();
    debug!("💻️ POST cart item {quantity} x #{product_id} for customer #{}", customer.0);
    let cart = api.add_item(customer.0, product_id, quantity).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(add_cart_items => Post "/cart/items/batch" impl CartManagement);
/// Adds several lines in one go. Either all of them make it into the cart or none do.
pub async fn add_cart_items<B: CartManagement>(
    customer: CustomerId,
    body: web::Json<AddItemsRequest>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let lines: Vec<CartLine> = body.into_inner().items;
    debug!("💻️ POST {} cart items for customer #{}", lines.len(), customer.0);
    let cart = api.add_multiple(customer.0, &lines).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(update_cart_item => Put "/cart/items/{item_id}" impl CartManagement);
pub async fn update_cart_item<B: CartManagement>(
    customer: CustomerId,
    path: web::Path<i64>,
    body: web::Json<QuantityUpdate>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let item_id = path.into_inner();
    debug!("💻️ PUT cart item #{item_id} for customer #{}", customer.0);
    let cart = api.update_item(customer.0, item_id, body.quantity).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(remove_cart_item => Delete "/cart/items/{item_id}" impl CartManagement);
/// Removes an item. Removing the last item deletes the cart, in which case the response is `null`.
pub async fn remove_cart_item<B: CartManagement>(
    customer: CustomerId,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let item_id = path.into_inner();
    debug!("💻️ DELETE cart item #{item_id} for customer #{}", customer.0);
    let cart = api.remove_item(customer.0, item_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

route!(clear_cart => Delete "/cart" impl CartManagement);
pub async fn clear_cart<B: CartManagement>(
    customer: CustomerId,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ DELETE cart for customer #{}", customer.0);
    api.clear(customer.0).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Cart cleared.")))
}

route!(switch_cart_vendor => Post "/cart/switch_vendor/{vendor_id}" impl CartManagement);
/// Empties the cart and rebinds it to another vendor.
pub async fn switch_cart_vendor<B: CartManagement>(
    customer: CustomerId,
    path: web::Path<i64>,
    api: web::Data<CartApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let vendor_id = path.into_inner();
    debug!("💻️ POST switch cart of customer #{} to vendor #{vendor_id}", customer.0);
    let cart = api.switch_vendor(customer.0, vendor_id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

//----------------------------------------------   Customer orders  ----------------------------------------------
route!(checkout => Post "/orders" impl MarketplaceBackend, PaymentGateway);
/// Turns the caller's cart into an order. Stock is reserved and the cart is deleted in the same step.
pub async fn checkout<B, G>(
    customer: CustomerId,
    body: web::Json<DeliveryInfo>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    debug!("💻️ POST checkout for customer #{}", customer.0);
    let order = api.create_from_cart(customer.0, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

route!(my_orders => Get "/orders" impl MarketplaceBackend, PaymentGateway);
/// The caller's orders, newest first. `?status=PENDING` (or any other status) narrows the list.
pub async fn my_orders<B, G>(
    customer: CustomerId,
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    debug!("💻️ GET orders for customer #{} ({:?})", customer.0, query.status);
    let orders = api.orders_for_customer(customer.0, query.status).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(my_order => Get "/orders/{order_id}" impl MarketplaceBackend, PaymentGateway);
pub async fn my_order<B, G>(
    customer: CustomerId,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    debug!("💻️ GET order #{order_id} for customer #{}", customer.0);
    let order = api.order_for_customer(customer.0, order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(cancel_my_order => Post "/orders/{order_id}/cancel" impl MarketplaceBackend, PaymentGateway);
/// Customers may cancel while the order is still `PENDING` or `ACCEPTED`. Paid orders are refunded.
pub async fn cancel_my_order<B, G>(
    customer: CustomerId,
    path: web::Path<i64>,
    body: Option<web::Json<ReasonRequest>>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    let reason = body.and_then(|b| b.into_inner().reason);
    info!("💻️ Customer #{} is cancelling order #{order_id}", customer.0);
    let order = api.cancel_order(customer.0, order_id, reason).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(my_order_payment => Get "/orders/{order_id}/payment" impl MarketplaceBackend, PaymentGateway);
pub async fn my_order_payment<B, G>(
    customer: CustomerId,
    path: web::Path<i64>,
    api: web::Data<PaymentApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    debug!("💻️ GET payment for order #{order_id} for customer #{}", customer.0);
    let payment = api.payment_for_order(customer.0, order_id).await?;
    Ok(HttpResponse::Ok().json(payment))
}

//----------------------------------------------   Vendor orders  ----------------------------------------------
route!(vendor_orders => Get "/vendor/orders" impl MarketplaceBackend, PaymentGateway);
pub async fn vendor_orders<B, G>(
    vendor: VendorId,
    query: web::Query<OrderListQuery>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    debug!("💻️ GET orders for vendor #{} ({:?})", vendor.0, query.status);
    let orders = api.orders_for_vendor(vendor.0, query.status).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(vendor_order => Get "/vendor/orders/{order_id}" impl MarketplaceBackend, PaymentGateway);
pub async fn vendor_order<B, G>(
    vendor: VendorId,
    path: web::Path<i64>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    debug!("💻️ GET order #{order_id} for vendor #{}", vendor.0);
    let order = api.order_for_vendor(vendor.0, order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(accept_order => Post "/vendor/orders/{order_id}/accept" impl MarketplaceBackend, PaymentGateway);
/// Accepts a pending order. An optional `estimated_minutes` in the body sets the estimated delivery time.
pub async fn accept_order<B, G>(
    vendor: VendorId,
    path: web::Path<i64>,
    body: Option<web::Json<AcceptOrderRequest>>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    let estimate = body.and_then(|b| b.estimated_minutes);
    info!("💻️ Vendor #{} is accepting order #{order_id}", vendor.0);
    let order = api.accept_order(vendor.0, order_id, estimate).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(reject_order => Post "/vendor/orders/{order_id}/reject" impl MarketplaceBackend, PaymentGateway);
pub async fn reject_order<B, G>(
    vendor: VendorId,
    path: web::Path<i64>,
    body: Option<web::Json<ReasonRequest>>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    let reason = body.and_then(|b| b.into_inner().reason);
    info!("💻️ Vendor #{} is rejecting order #{order_id}", vendor.0);
    let order = api.reject_order(vendor.0, order_id, reason).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Post "/vendor/orders/{order_id}/status" impl MarketplaceBackend, PaymentGateway);
/// Moves an order along the status graph, e.g. `{"status": "READY"}`.
pub async fn update_order_status<B, G>(
    vendor: VendorId,
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
    api: web::Data<OrderFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = path.into_inner();
    let StatusUpdateRequest { status, reason } = body.into_inner();
    info!("💻️ Vendor #{} is moving order #{order_id} to {status}", vendor.0);
    let order = api.update_status(vendor.0, order_id, status, reason).await?;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Storefront  --------------------------------------------------
// Browsing is open to everyone. No identity header is needed.
route!(storefront_vendor => Get "/vendors/{vendor_id}" impl CatalogManagement);
pub async fn storefront_vendor<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let vendor_id = path.into_inner();
    trace!("💻️ GET storefront for vendor #{vendor_id}");
    let vendor = api.storefront_vendor(vendor_id).await?;
    Ok(HttpResponse::Ok().json(vendor))
}

route!(storefront_products => Get "/vendors/{vendor_id}/products" impl CatalogManagement);
/// The vendor's active products. `?q=dosa` filters by a case-insensitive substring of the name.
pub async fn storefront_products<B: CatalogManagement>(
    path: web::Path<i64>,
    query: web::Query<ProductSearch>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let vendor_id = path.into_inner();
    trace!("💻️ GET storefront products for vendor #{vendor_id}");
    let products = api.storefront_products(vendor_id, query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(storefront_product => Get "/products/{product_id}" impl CatalogManagement);
pub async fn storefront_product<B: CatalogManagement>(
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    trace!("💻️ GET storefront product #{product_id}");
    let product = api.storefront_product(product_id).await?;
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Vendor catalog  ----------------------------------------------
route!(vendor_products => Get "/vendor/products" impl CatalogManagement);
/// The vendor's products. `?q=dosa` filters by a case-insensitive substring of the name.
pub async fn vendor_products<B: CatalogManagement>(
    vendor: VendorId,
    query: web::Query<ProductSearch>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET products for vendor #{}", vendor.0);
    let products = api.products_for_vendor(vendor.0, query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(create_product => Post "/vendor/products" impl CatalogManagement);
pub async fn create_product<B: CatalogManagement>(
    vendor: VendorId,
    body: web::Json<NewProduct>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product = body.into_inner();
    info!("💻️ Vendor #{} is adding product \"{}\"", vendor.0, product.name);
    let product = api.create_product(vendor.0, product).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(vendor_product => Get "/vendor/products/{product_id}" impl CatalogManagement);
pub async fn vendor_product<B: CatalogManagement>(
    vendor: VendorId,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    debug!("💻️ GET product #{product_id} for vendor #{}", vendor.0);
    let product = api.vendor_product(vendor.0, product_id).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_product => Put "/vendor/products/{product_id}" impl CatalogManagement);
/// Partial update. Only the fields present in the body are changed.
pub async fn update_product<B: CatalogManagement>(
    vendor: VendorId,
    path: web::Path<i64>,
    body: web::Json<ProductUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    debug!("💻️ PUT product #{product_id} for vendor #{}", vendor.0);
    let product = api.update_product(vendor.0, product_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(update_product_stock => Post "/vendor/products/{product_id}/stock" impl CatalogManagement);
pub async fn update_product_stock<B: CatalogManagement>(
    vendor: VendorId,
    path: web::Path<i64>,
    body: web::Json<StockUpdate>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    info!("💻️ Vendor #{} is setting stock for product #{product_id} to {}", vendor.0, body.stock);
    let product = api.update_stock(vendor.0, product_id, body.stock).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(toggle_product => Post "/vendor/products/{product_id}/toggle" impl CatalogManagement);
pub async fn toggle_product<B: CatalogManagement>(
    vendor: VendorId,
    path: web::Path<i64>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let product_id = path.into_inner();
    let product = api.toggle_active(vendor.0, product_id).await?;
    info!("💻️ Vendor #{} set product #{product_id} active={}", vendor.0, product.active);
    Ok(HttpResponse::Ok().json(product))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(payment_intent => Post "/payments/intent" impl MarketplaceBackend, PaymentGateway);
/// Registers the order with the gateway and returns what the checkout widget needs.
pub async fn payment_intent<B, G>(
    customer: CustomerId,
    body: web::Json<PaymentIntentRequest>,
    api: web::Data<PaymentApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let order_id = body.order_id;
    debug!("💻️ POST payment intent for order #{order_id} by customer #{}", customer.0);
    let intent = api.create_payment_intent(customer.0, order_id).await?;
    Ok(HttpResponse::Ok().json(intent))
}

route!(verify_payment => Post "/payments/verify" impl MarketplaceBackend, PaymentGateway);
/// Checks the checkout signature the customer's browser received from the gateway and records the payment.
pub async fn verify_payment<B, G>(
    customer: CustomerId,
    body: web::Json<PaymentProof>,
    api: web::Data<PaymentApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    let proof = body.into_inner();
    debug!("💻️ POST verify payment #{} by customer #{}", proof.payment_id, customer.0);
    let payment = api.verify_payment(customer.0, proof).await?;
    Ok(HttpResponse::Ok().json(payment))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(razorpay_webhook => Post "/razorpay" impl MarketplaceBackend, PaymentGateway);
/// Consumes gateway webhooks.
///
/// The signature covers the raw body, so the body is taken as bytes and never re-serialized. Events that can never
/// succeed (bad signatures, unknown payments, unhandled events) are answered with a 200 so that the gateway stops
/// redelivering them. An event that could not be stored gets a 503 so that the gateway tries again later. The outcome
/// is reported in the body for debugging only.
pub async fn razorpay_webhook<B, G>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PaymentApi<B, G>>,
    options: web::Data<ServerOptions>,
) -> HttpResponse
where
    B: MarketplaceBackend,
    G: PaymentGateway,
{
    trace!("🪝️ Received webhook request: {}", req.uri());
    let signature = req.headers().get(options.webhook_signature_header.as_str()).and_then(|v| v.to_str().ok());
    let mut response = HttpResponse::Ok();
    let result = match api.handle_webhook(&body, signature).await {
        WebhookOutcome::Applied { gateway_order_id, status, changed } => {
            let what = if changed { "updated to" } else { "already" };
            JsonResponse::success(format!("Payment for {gateway_order_id} {what} {status}"))
        },
        WebhookOutcome::UnhandledEvent(event) => JsonResponse::success(format!("Ignored event {event}")),
        WebhookOutcome::UnknownPayment(id) => JsonResponse::failure(format!("Unknown gateway order {id}")),
        WebhookOutcome::BadSignature => JsonResponse::failure("Invalid signature"),
        WebhookOutcome::Malformed => JsonResponse::failure("Malformed webhook body"),
        WebhookOutcome::StorageError(e) => {
            error!("🪝️ Webhook could not be stored. The gateway will redeliver it. {e}");
            response = HttpResponse::ServiceUnavailable();
            JsonResponse::failure("The event could not be stored")
        },
    };
    response.json(result)
}

/// The order status graph is public knowledge; clients use this to decide which buttons to show.
#[get("/order_statuses")]
pub async fn order_statuses() -> impl Responder {
    let graph: Vec<(OrderStatusType, Vec<OrderStatusType>)> =
        OrderStatusType::ALL.iter().map(|s| (*s, s.allowed_next().to_vec())).collect();
    HttpResponse::Ok().json(graph)
}
