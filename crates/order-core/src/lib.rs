//! Core order lifecycle for the order service.
//!
//! This crate owns the business rules around orders: request validation,
//! total computation and the status state machine. Persistence is delegated
//! to an [`order_storage::OrderStore`] chosen at startup by the
//! [`OrderEngineBuilder`].

use order_storage::StorageError;
use order_types::OrderStatus;
use thiserror::Error;

pub mod builder;
pub mod engine;
pub mod state;
pub mod validation;

pub use builder::{BuilderError, OrderEngineBuilder, OrderFactories};
pub use engine::OrderEngine;
pub use state::{allowed_transitions, is_valid_transition, OrderStateMachine};

/// Errors returned by lifecycle operations.
#[derive(Debug, Error)]
pub enum OrderError {
	/// The create or status request is malformed. Nothing was persisted.
	#[error("Validation error: {0}")]
	Validation(String),
	/// No order exists with the given id.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// The requested status is not reachable from the current one.
	#[error("Invalid status transition from {current} to {requested}")]
	InvalidTransition {
		current: OrderStatus,
		requested: OrderStatus,
		allowed: Vec<OrderStatus>,
		message: Option<String>,
	},
	/// The store failed. The message is for logs, not for clients.
	#[error("Persistence error: {0}")]
	Persistence(String),
}

impl From<StorageError> for OrderError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound(id) => OrderError::NotFound(id),
			other => OrderError::Persistence(other.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_storage_error_mapping() {
		assert!(matches!(
			OrderError::from(StorageError::NotFound("abc".into())),
			OrderError::NotFound(id) if id == "abc"
		));
		assert!(matches!(
			OrderError::from(StorageError::Backend("connection reset".into())),
			OrderError::Persistence(msg) if msg.contains("connection reset")
		));
		assert!(matches!(
			OrderError::from(StorageError::Configuration("bad".into())),
			OrderError::Persistence(_)
		));
	}

	#[test]
	fn test_invalid_transition_display() {
		let err = OrderError::InvalidTransition {
			current: OrderStatus::Confirmed,
			requested: OrderStatus::Shipped,
			allowed: vec![OrderStatus::Processing, OrderStatus::Cancelled],
			message: None,
		};
		assert_eq!(
			err.to_string(),
			"Invalid status transition from confirmed to shipped"
		);
	}
}
