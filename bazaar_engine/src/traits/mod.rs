//! # Backend interface contracts
//!
//! The traits in this module define what a storage backend must provide for the marketplace engine to run on it,
//! plus the contract the engine keeps with the external payment gateway.
//!
//! * [`CatalogManagement`] covers vendors and products.
//! * [`CartManagement`] owns the single-vendor cart and its invariants.
//! * [`OrderManagement`] handles checkout, the order status graph and the stock ledger.
//! * [`PaymentManagement`] stores payment records and applies idempotent status updates.
//! * [`PaymentGateway`] is implemented by a client for the third-party payment processor.
//!
//! All backend methods that mutate state must be atomic.
mod cart_management;
mod catalog_management;
mod errors;
mod order_management;
mod payment_gateway;
mod payment_management;

pub mod data_objects;

pub use cart_management::CartManagement;
pub use catalog_management::CatalogManagement;
pub use errors::MarketplaceError;
pub use order_management::OrderManagement;
pub use payment_gateway::PaymentGateway;
pub use payment_management::PaymentManagement;
