//! Common types module for the order service.
//!
//! This module defines the core data types shared by the storage backends,
//! the lifecycle engine and the HTTP service, so that every layer agrees on
//! one representation of an order.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Order, order item and status types.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Configuration validation types for backend configuration tables.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use validation::*;
