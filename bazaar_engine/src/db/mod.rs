//! # Storage backends
//!
//! Implementations of the backend traits in [`crate::traits`]. SQLite is currently the only supported backend.
#[cfg(feature = "sqlite")]
pub mod sqlite;
