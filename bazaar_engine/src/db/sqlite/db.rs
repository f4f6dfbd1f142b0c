use std::{
    collections::BTreeMap,
    fmt::Debug,
    ops::{Deref, DerefMut},
    sync::Arc,
};

use chrono::Utc;
use log::*;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{carts, new_pool, orders, payments, products, vendors, SqliteDatabaseError};
use crate::{
    db_types::{
        Actor,
        Cart,
        CartItem,
        CartLine,
        DeliveryInfo,
        NewPayment,
        NewProduct,
        NewVendor,
        OrderQueryFilter,
        OrderStatusType,
        OrderTransition,
        Payment,
        PaymentStatus,
        PaymentUpdate,
        Product,
        ProductUpdate,
        RefundRecord,
        Vendor,
    },
    fees::{distance_km, FeeSchedule},
    helpers::{new_order_number, MAX_ORDER_NUMBER_ATTEMPTS},
    traits::{
        data_objects::{CartContents, OrderDetails, PaymentUpdateResult, TransitionResult},
        CartManagement,
        CatalogManagement,
        MarketplaceError,
        OrderManagement,
        PaymentManagement,
    },
};

/// SQLite backend for the marketplace.
///
/// SQLite allows one writer at a time. A deferred transaction that reads before it writes cannot wait for the write
/// lock, so it fails with `SQLITE_BUSY` when another connection commits first. Every write therefore goes through
/// [`SqliteDatabase::begin_write`], which holds `write_lock` until the transaction ends. Clones share the lock.
#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

/// A transaction that excludes every other writer on the same [`SqliteDatabase`]. Dropping it without calling
/// [`WriteTransaction::commit`] rolls back.
pub struct WriteTransaction {
    tx: Transaction<'static, Sqlite>,
    _guard: OwnedMutexGuard<()>,
}

impl WriteTransaction {
    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

impl Deref for WriteTransaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl DerefMut for WriteTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool, write_lock: Arc::new(Mutex::new(())) })
    }

    /// Creates a connection pool and brings the schema up to date.
    pub async fn new_with_migrations(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let db = Self::new_with_url(url, max_connections).await?;
        sqlx::migrate!("./src/db/sqlite/migrations").run(&db.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(db)
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Waits for any other write on this database to finish, then opens a transaction.
    pub async fn begin_write(&self) -> Result<WriteTransaction, sqlx::Error> {
        let guard = self.write_lock.clone().lock_owned().await;
        let tx = self.pool.begin().await?;
        Ok(WriteTransaction { tx, _guard: guard })
    }

    pub async fn close(&mut self) -> Result<(), SqliteDatabaseError> {
        self.pool.close().await;
        Ok(())
    }
}

//--------------------------------------      Catalog        ---------------------------------------------------------
impl CatalogManagement for SqliteDatabase {
    async fn insert_vendor(&self, vendor: NewVendor) -> Result<Vendor, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let vendor = vendors::insert_vendor(vendor, &mut tx).await?;
        tx.commit().await?;
        Ok(vendor)
    }

    async fn fetch_vendor(&self, vendor_id: i64) -> Result<Option<Vendor>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        vendors::fetch_vendor(vendor_id, &mut conn).await
    }

    async fn insert_product(&self, vendor_id: i64, product: NewProduct) -> Result<Product, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        vendors::fetch_vendor(vendor_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Vendor #{vendor_id}")))?;
        let product = products::insert_product(vendor_id, product, &mut tx).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_product(product_id, &mut conn).await
    }

    async fn fetch_products_for_vendor(
        &self,
        vendor_id: i64,
        name_query: Option<&str>,
    ) -> Result<Vec<Product>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        products::fetch_products_for_vendor(vendor_id, name_query, &mut conn).await
    }

    async fn update_product(
        &self,
        vendor_id: i64,
        product_id: i64,
        update: ProductUpdate,
    ) -> Result<Product, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        products::fetch_vendor_product(vendor_id, product_id, &mut tx).await?;
        products::update_product(product_id, update, &mut tx).await?;
        let product = products::fetch_vendor_product(vendor_id, product_id, &mut tx).await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn set_product_stock(
        &self,
        vendor_id: i64,
        product_id: i64,
        stock: i64,
    ) -> Result<Product, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        products::fetch_vendor_product(vendor_id, product_id, &mut tx).await?;
        products::set_stock(product_id, stock, &mut tx).await?;
        let product = products::fetch_vendor_product(vendor_id, product_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Stock for product #{product_id} set to {stock}");
        Ok(product)
    }

    async fn toggle_product(&self, vendor_id: i64, product_id: i64) -> Result<Product, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        products::fetch_vendor_product(vendor_id, product_id, &mut tx).await?;
        products::toggle_active(product_id, &mut tx).await?;
        let product = products::fetch_vendor_product(vendor_id, product_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Product #{product_id} active flag is now {}", product.active);
        Ok(product)
    }
}

//--------------------------------------        Cart         ---------------------------------------------------------
impl CartManagement for SqliteDatabase {
    async fn fetch_cart(&self, customer_id: i64) -> Result<Option<CartContents>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_cart_contents(customer_id, &mut conn).await
    }

    async fn add_to_cart(&self, customer_id: i64, lines: &[CartLine]) -> Result<CartContents, MarketplaceError> {
        if lines.is_empty() {
            return Err(MarketplaceError::ValidationError("At least one item is required".into()));
        }
        // Requests may name the same product more than once
        let mut requested = BTreeMap::<i64, i64>::new();
        for line in lines {
            if line.quantity < 1 {
                return Err(MarketplaceError::ValidationError(format!(
                    "Quantity for product #{} must be at least 1",
                    line.product_id
                )));
            }
            *requested.entry(line.product_id).or_default() += line.quantity;
        }
        let mut tx = self.begin_write().await?;
        // Validate everything before writing anything
        let mut lines = Vec::with_capacity(requested.len());
        for (&product_id, &quantity) in &requested {
            let product = products::fetch_product(product_id, &mut tx)
                .await?
                .ok_or_else(|| MarketplaceError::NotFound(format!("Product #{product_id}")))?;
            if !product.active {
                return Err(MarketplaceError::Unavailable(format!("Product {}", product.name)));
            }
            lines.push((product, quantity));
        }
        let vendor_id = lines[0].0.vendor_id;
        if lines.iter().any(|(p, _)| p.vendor_id != vendor_id) {
            return Err(MarketplaceError::ValidationError("All items must be from the same vendor".into()));
        }
        vendors::fetch_active_vendor(vendor_id, &mut tx).await?;
        let existing = carts::fetch_cart_contents(customer_id, &mut tx).await?;
        if let Some(contents) = &existing {
            if contents.cart.vendor_id != vendor_id && !contents.items.is_empty() {
                debug!(
                    "🗃️ Customer #{customer_id} tried to add items from vendor #{vendor_id} to a cart for vendor #{}",
                    contents.cart.vendor_id
                );
                return Err(MarketplaceError::VendorConflict {
                    cart_vendor_id: contents.cart.vendor_id,
                    requested_vendor_id: vendor_id,
                });
            }
        }
        let current_qty = |product_id: i64| {
            existing
                .as_ref()
                .and_then(|c| c.items.iter().find(|i| i.product_id == product_id))
                .map(|i| (i.id, i.quantity))
        };
        for (product, quantity) in &lines {
            let total = quantity + current_qty(product.id).map(|(_, q)| q).unwrap_or(0);
            if product.stock < total {
                return Err(MarketplaceError::InsufficientStock {
                    product_id: product.id,
                    requested: total,
                    available: product.stock,
                });
            }
        }
        // All checks passed. Apply the changes.
        let cart_id = match &existing {
            Some(contents) => {
                if contents.cart.vendor_id != vendor_id {
                    carts::set_cart_vendor(contents.cart.id, vendor_id, &mut tx).await?;
                }
                contents.cart.id
            },
            None => carts::insert_cart(customer_id, vendor_id, &mut tx).await?.id,
        };
        for (product, quantity) in &lines {
            match current_qty(product.id) {
                Some((item_id, current)) => carts::set_item_quantity(item_id, current + quantity, &mut tx).await?,
                None => carts::insert_cart_item(cart_id, product.id, *quantity, product.price, &mut tx).await?,
            }
        }
        carts::touch_cart(cart_id, &mut tx).await?;
        let contents = carts::fetch_cart_contents(customer_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::DatabaseError(format!("Cart for customer #{customer_id} vanished")))?;
        tx.commit().await?;
        Ok(contents)
    }

    async fn update_cart_item(
        &self,
        customer_id: i64,
        item_id: i64,
        quantity: i64,
    ) -> Result<CartContents, MarketplaceError> {
        if quantity < 1 {
            return Err(MarketplaceError::ValidationError("Quantity must be at least 1".into()));
        }
        let mut tx = self.begin_write().await?;
        let (cart, item) = owned_cart_item(customer_id, item_id, &mut tx).await?;
        let product = products::fetch_product(item.product_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Product #{}", item.product_id)))?;
        if !product.active {
            return Err(MarketplaceError::Unavailable(format!("Product {}", product.name)));
        }
        if product.stock < quantity {
            return Err(MarketplaceError::InsufficientStock {
                product_id: product.id,
                requested: quantity,
                available: product.stock,
            });
        }
        carts::set_item_quantity(item_id, quantity, &mut tx).await?;
        carts::touch_cart(cart.id, &mut tx).await?;
        let items = carts::fetch_cart_items(cart.id, &mut tx).await?;
        tx.commit().await?;
        Ok(CartContents { cart, items })
    }

    async fn remove_cart_item(&self, customer_id: i64, item_id: i64) -> Result<Option<CartContents>, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let (cart, _) = owned_cart_item(customer_id, item_id, &mut tx).await?;
        carts::delete_cart_item(item_id, &mut tx).await?;
        let items = carts::fetch_cart_items(cart.id, &mut tx).await?;
        let result = if items.is_empty() {
            carts::delete_cart(cart.id, &mut tx).await?;
            None
        } else {
            carts::touch_cart(cart.id, &mut tx).await?;
            Some(CartContents { cart, items })
        };
        tx.commit().await?;
        Ok(result)
    }

    async fn clear_cart(&self, customer_id: i64) -> Result<bool, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let deleted = match carts::fetch_cart(customer_id, &mut tx).await? {
            Some(cart) => {
                carts::delete_cart(cart.id, &mut tx).await?;
                true
            },
            None => false,
        };
        tx.commit().await?;
        Ok(deleted)
    }

    async fn switch_cart_vendor(&self, customer_id: i64, vendor_id: i64) -> Result<CartContents, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        vendors::fetch_active_vendor(vendor_id, &mut tx).await?;
        if let Some(cart) = carts::fetch_cart(customer_id, &mut tx).await? {
            carts::delete_cart(cart.id, &mut tx).await?;
        }
        let cart = carts::insert_cart(customer_id, vendor_id, &mut tx).await?;
        tx.commit().await?;
        Ok(CartContents { cart, items: vec![] })
    }
}

/// Fetches a cart item, checking that it lives in the customer's cart.
async fn owned_cart_item(
    customer_id: i64,
    item_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(Cart, CartItem), MarketplaceError> {
    let item = carts::fetch_cart_item(item_id, &mut *conn)
        .await?
        .ok_or_else(|| MarketplaceError::NotFound(format!("Cart item #{item_id}")))?;
    let cart = carts::fetch_cart(customer_id, conn).await?;
    match cart {
        Some(cart) if cart.id == item.cart_id => Ok((cart, item)),
        _ => Err(MarketplaceError::Unauthorized(format!("Cart item #{item_id} is not in your cart"))),
    }
}

//--------------------------------------       Orders        ---------------------------------------------------------
impl OrderManagement for SqliteDatabase {
    async fn create_order_from_cart(
        &self,
        customer_id: i64,
        delivery: DeliveryInfo,
        fees: &FeeSchedule,
    ) -> Result<OrderDetails, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let contents = carts::fetch_cart_contents(customer_id, &mut tx).await?.ok_or(MarketplaceError::EmptyCart)?;
        if contents.items.is_empty() {
            return Err(MarketplaceError::EmptyCart);
        }
        let vendor = vendors::fetch_active_vendor(contents.cart.vendor_id, &mut tx).await?;
        // Time may have passed since the items were added. Check them against the live products again.
        let mut lines = Vec::with_capacity(contents.items.len());
        for item in &contents.items {
            let product = products::fetch_product(item.product_id, &mut tx)
                .await?
                .ok_or_else(|| MarketplaceError::NotFound(format!("Product #{}", item.product_id)))?;
            if !product.active {
                return Err(MarketplaceError::Unavailable(format!("Product {}", product.name)));
            }
            if product.stock < item.quantity {
                return Err(MarketplaceError::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available: product.stock,
                });
            }
            lines.push((product, item));
        }
        let distance = distance_km(vendor.location(), delivery.location());
        let breakdown = fees.calculate(contents.subtotal(), distance)?;
        let order_number = allocate_order_number(&mut tx).await?;
        let order_id =
            orders::insert_order(&order_number, customer_id, vendor.id, &breakdown, &delivery, &mut tx).await?;
        for (product, item) in &lines {
            orders::insert_order_item(order_id, product, item.quantity, item.price, &mut tx).await?;
            if !products::decrement_stock(product.id, item.quantity, &mut tx).await? {
                warn!(
                    "🗃️ Stock for product #{} ran out while order {order_number} was being placed. Rolling back.",
                    product.id
                );
                let available = products::fetch_product(product.id, &mut tx).await?.map(|p| p.stock).unwrap_or(0);
                return Err(MarketplaceError::InsufficientStock {
                    product_id: product.id,
                    requested: item.quantity,
                    available,
                });
            }
        }
        carts::delete_cart(contents.cart.id, &mut tx).await?;
        let details = orders::fetch_order_details(order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::DatabaseError(format!("Order #{order_id} vanished")))?;
        tx.commit().await?;
        debug!("🗃️ Order {order_number} created for customer #{customer_id}. Total {}", breakdown.total);
        Ok(details)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderDetails>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_details(order_id, &mut conn).await
    }

    async fn fetch_orders(&self, filter: OrderQueryFilter) -> Result<Vec<OrderDetails>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders(filter, &mut conn).await
    }

    async fn transition_order(
        &self,
        order_id: i64,
        transition: OrderTransition,
    ) -> Result<TransitionResult, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let order = orders::fetch_order(order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Order #{order_id}")))?;
        let old_status = order.status;
        let new_status = transition.new_status;
        match transition.actor {
            Actor::Customer(id) => {
                if order.customer_id != id {
                    return Err(MarketplaceError::Unauthorized(format!("Order #{order_id} does not belong to you")));
                }
                if new_status != OrderStatusType::Cancelled {
                    return Err(MarketplaceError::Unauthorized("Customers may only cancel orders".into()));
                }
                if !old_status.is_customer_cancellable() && !old_status.is_terminal() {
                    return Err(MarketplaceError::InvalidState(format!(
                        "Order {} is {old_status} and can no longer be cancelled",
                        order.order_number
                    )));
                }
            },
            Actor::Vendor(id) => {
                if order.vendor_id != id {
                    return Err(MarketplaceError::Unauthorized(format!(
                        "Order #{order_id} does not belong to vendor #{id}"
                    )));
                }
            },
        }
        if !old_status.can_transition_to(new_status) {
            return Err(MarketplaceError::InvalidTransition { from: old_status, to: new_status });
        }
        if !orders::update_order_status(order_id, old_status, &transition, &mut tx).await? {
            return Err(MarketplaceError::InvalidState(format!(
                "Order {} was modified by another request",
                order.order_number
            )));
        }
        if new_status.restores_stock() {
            for item in orders::fetch_order_items(order_id, &mut tx).await? {
                products::restore_stock(item.product_id, item.quantity, &mut tx).await?;
            }
            debug!("🗃️ Stock restored for {new_status} order {}", order.order_number);
        }
        let details = orders::fetch_order_details(order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::DatabaseError(format!("Order #{order_id} vanished")))?;
        tx.commit().await?;
        debug!("🗃️ Order {} moved from {old_status} to {new_status} by {}", order.order_number, transition.actor);
        Ok(TransitionResult { old_status, details })
    }
}

/// Draws order numbers until one is free. Collisions need two checkouts in the same minute to draw the same suffix.
async fn allocate_order_number(conn: &mut SqliteConnection) -> Result<String, MarketplaceError> {
    for attempt in 1..=MAX_ORDER_NUMBER_ATTEMPTS {
        let candidate = new_order_number(Utc::now());
        if !orders::order_number_exists(&candidate, &mut *conn).await? {
            return Ok(candidate);
        }
        debug!("🗃️ Order number {candidate} is taken (attempt {attempt}). Trying again.");
    }
    error!("🗃️ Could not allocate a free order number after {MAX_ORDER_NUMBER_ATTEMPTS} attempts");
    Err(MarketplaceError::DatabaseError("Could not allocate an order number".into()))
}

//--------------------------------------      Payments       ---------------------------------------------------------
impl PaymentManagement for SqliteDatabase {
    async fn fetch_payment(&self, payment_id: i64) -> Result<Option<Payment>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment(payment_id, &mut conn).await
    }

    async fn fetch_payment_for_order(&self, order_id: i64) -> Result<Option<Payment>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment_for_order(order_id, &mut conn).await
    }

    async fn fetch_payment_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<Payment>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        payments::fetch_payment_by_gateway_order_id(gateway_order_id, &mut conn).await
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let order_id = payment.order_id;
        let order = orders::fetch_order(order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Order #{order_id}")))?;
        if payments::fetch_payment_for_order(order_id, &mut tx).await?.is_some() {
            return Err(MarketplaceError::AlreadyExists(format!("A payment for order {}", order.order_number)));
        }
        if order.status != OrderStatusType::Pending {
            return Err(MarketplaceError::InvalidState(format!(
                "Order {} is {} and cannot be paid for",
                order.order_number, order.status
            )));
        }
        let payment = payments::insert_payment(payment, &mut tx).await?;
        tx.commit().await?;
        Ok(payment)
    }

    async fn update_payment_status(
        &self,
        gateway_order_id: &str,
        update: PaymentUpdate,
    ) -> Result<PaymentUpdateResult, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let payment = payments::fetch_payment_by_gateway_order_id(gateway_order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Payment for gateway order {gateway_order_id}")))?;
        let old_status = payment.status;
        let requested = update.status;
        let outcome = if old_status == requested {
            payments::apply_update(payment.id, requested, &update, &mut tx).await?;
            Outcome::Unchanged
        } else if old_status.can_transition_to(requested) {
            payments::apply_update(payment.id, requested, &update, &mut tx).await?;
            orders::update_payment_status(payment.order_id, requested, &mut tx).await?;
            Outcome::Updated
        } else {
            if update.webhook_verified {
                payments::mark_webhook_verified(payment.id, &mut tx).await?;
            }
            Outcome::Ignored
        };
        let payment = payments::fetch_payment_by_gateway_order_id(gateway_order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::DatabaseError(format!("Payment {gateway_order_id} vanished")))?;
        tx.commit().await?;
        let result = match outcome {
            Outcome::Updated => {
                debug!("🗃️ Payment [{gateway_order_id}] moved from {old_status} to {requested}");
                PaymentUpdateResult::Updated { old_status, payment }
            },
            Outcome::Unchanged => PaymentUpdateResult::Unchanged(payment),
            Outcome::Ignored => PaymentUpdateResult::Ignored { requested, payment },
        };
        Ok(result)
    }

    async fn record_refund(&self, order_id: i64, refund: RefundRecord) -> Result<Payment, MarketplaceError> {
        let mut tx = self.begin_write().await?;
        let payment = payments::fetch_payment_for_order(order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::NotFound(format!("Payment for order #{order_id}")))?;
        match payment.status {
            PaymentStatus::Success => {},
            PaymentStatus::Refunded => return Err(MarketplaceError::AlreadyRefunded(order_id)),
            s => return Err(MarketplaceError::InvalidState(format!("Cannot refund a payment that is {s}"))),
        }
        payments::mark_refunded(payment.id, &refund, &mut tx).await?;
        orders::update_payment_status(order_id, PaymentStatus::Refunded, &mut tx).await?;
        let payment = payments::fetch_payment_for_order(order_id, &mut tx)
            .await?
            .ok_or_else(|| MarketplaceError::DatabaseError(format!("Payment for order #{order_id} vanished")))?;
        tx.commit().await?;
        Ok(payment)
    }
}

enum Outcome {
    Updated,
    Unchanged,
    Ignored,
}
