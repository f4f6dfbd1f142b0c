//! Bazaar marketplace engine
//!
//! The engine is the transactional core of the Bazaar marketplace: it prices carts, turns them into orders, keeps the
//! stock ledger straight, drives orders through their status graph and reconciles payments with the payment gateway.
//! It is storage- and gateway-agnostic.
//!
//! The library is divided into these main sections:
//! 1. Backend contracts ([`mod@traits`]). A storage backend implements these to host the engine; a gateway client
//!    implements [`PaymentGateway`]. SQLite is the supplied backend. You should never need to access the database
//!    directly. The data types used in the database are defined in [`mod@db_types`] and are public.
//! 2. The public API (`bzr_api`). [`CatalogApi`], [`CartApi`], [`OrderFlowApi`] and [`PaymentApi`] provide the
//!    public-facing functionality of the marketplace.
//! 3. The fee engine ([`mod@fees`]), a set of pure functions.
//!
//! The engine also emits events when order and payment statuses change. A small actor framework ([`mod@events`])
//! lets you hook into these events and perform custom actions.
mod bzr_api;
mod db;

pub mod db_types;
pub mod events;
pub mod fees;
pub mod helpers;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use bzr_api::{
    cart_api::CartApi,
    catalog_api::CatalogApi,
    order_flow_api::OrderFlowApi,
    order_objects,
    payment_api::PaymentApi,
    payment_objects,
};
#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use traits::{
    CartManagement,
    CatalogManagement,
    MarketplaceError,
    OrderManagement,
    PaymentGateway,
    PaymentManagement,
};
