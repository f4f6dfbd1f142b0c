//! # Razorpay tools
//!
//! A thin client for the three Razorpay REST calls the marketplace needs:
//! * `POST /orders` creates a gateway order for an amount in minor units,
//! * `GET /payments/{id}` fetches the authoritative state of a payment,
//! * `POST /payments/{id}/refund` refunds a captured payment.
mod api;
mod config;
mod error;

pub mod data_objects;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, NewRefund, RazorpayCard, RazorpayOrder, RazorpayPayment, RazorpayRefund};
pub use error::RazorpayApiError;
