//! # Bazaar engine public API
//!
//! The `bzr_api` module exposes the programmatic API for the marketplace engine. Each API wraps a backend that
//! implements the traits it needs, so callers can pick the pieces they want.
//!
//! * [`catalog_api`] manages vendors and their products.
//! * [`cart_api`] manages the single-vendor shopping cart and prices it with the fee schedule.
//! * [`order_flow_api`] turns carts into orders and drives the order status graph for customers and vendors.
//! * [`payment_api`] creates gateway payment intents, verifies payments, consumes webhooks and issues refunds.
//!
//! # API usage
//!
//! ```rust,ignore
//! use bazaar_engine::{CartApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements CartManagement
//! let api = CartApi::new(db, FeeSchedule::default());
//! let cart = api.add_item(customer_id, product_id, 2).await?;
//! ```
pub mod cart_api;
pub mod catalog_api;
pub mod order_flow_api;
pub mod order_objects;
pub mod payment_api;
pub mod payment_objects;
