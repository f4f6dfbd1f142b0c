use bazaar_common::MoneyConversionError;
use thiserror::Error;

use crate::db_types::OrderStatusType;

/// The error taxonomy shared by every engine API and backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketplaceError {
    #[error("{0} does not exist")]
    NotFound(String),
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("Insufficient stock for product #{product_id}. Requested {requested}, but only {available} available")]
    InsufficientStock { product_id: i64, requested: i64, available: i64 },
    #[error(
        "Your cart contains items from vendor #{cart_vendor_id}. Clear the cart or switch vendor before adding items \
         from vendor #{requested_vendor_id}"
    )]
    VendorConflict { cart_vendor_id: i64, requested_vendor_id: i64 },
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatusType, to: OrderStatusType },
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Payment signature verification failed")]
    InvalidSignature,
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("The payment for order #{0} has already been refunded")]
    AlreadyRefunded(i64),
    #[error("Payment gateway error: {0}")]
    GatewayError(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("The cart is empty")]
    EmptyCart,
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for MarketplaceError {
    fn from(e: sqlx::Error) -> Self {
        MarketplaceError::DatabaseError(e.to_string())
    }
}

impl From<MoneyConversionError> for MarketplaceError {
    fn from(e: MoneyConversionError) -> Self {
        MarketplaceError::ValidationError(e.to_string())
    }
}
