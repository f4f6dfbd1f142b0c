//! # Bazaar server
//! This crate hosts the HTTP front end for the Bazaar marketplace engine. It is responsible for:
//! * Translating customer and vendor requests into engine calls.
//! * Consuming payment gateway webhooks.
//! * Wiring the Razorpay client into the engine as its payment gateway.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/...`: Cart, order, catalog and payment routes. See [routes](routes/index.html).
//! * `/webhook/razorpay`: The gateway's webhook endpoint.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
