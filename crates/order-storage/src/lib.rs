//! Storage module for the order service.
//!
//! This module provides the persistence contract for orders and their line
//! items, with a relational PostgreSQL backend for production and an
//! in-memory backend for tests and local development.
//!
//! Stores perform no business validation: status transitions are checked by
//! the lifecycle engine before they reach [`OrderStore::update_status`].

use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry, NewOrder, Order, OrderStatus, Page};
use thiserror::Error;
use uuid::Uuid;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
	pub mod postgres;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when the targeted order does not exist.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// Error that occurs in the storage backend (connectivity, constraint
	/// violation, transaction failure, undecodable row).
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the persistence interface for orders.
///
/// Implementations must be safe to call concurrently; all state lives in the
/// backend.
#[async_trait]
pub trait OrderStore: Send + Sync {
	/// Prepares the backend before first use (e.g. applies schema migrations).
	async fn initialize(&self) -> Result<(), StorageError> {
		Ok(())
	}

	/// Persists an order and all of its items atomically.
	///
	/// Either the order row and every item row become visible together, or
	/// nothing does. The returned order carries generated ids and timestamps
	/// and its items in submission order.
	async fn create_order(&self, order: NewOrder) -> Result<Order, StorageError>;

	/// Fetches an order with its items, or `None` if no such order exists.
	async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StorageError>;

	/// Lists a user's orders, newest first, without items.
	async fn list_orders_by_user(
		&self,
		user_id: &str,
		page: Page,
	) -> Result<Vec<Order>, StorageError>;

	/// Lists all orders, newest first, without items.
	async fn list_orders(&self, page: Page) -> Result<Vec<Order>, StorageError>;

	/// Overwrites the status of an order and refreshes `updated_at`.
	///
	/// This is a blind last-writer-wins update. Returns the order as persisted
	/// after the write, without items, or [`StorageError::NotFound`].
	async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, StorageError>;

	/// Checks that the backend is reachable.
	async fn health_check(&self) -> Result<(), StorageError> {
		Ok(())
	}

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn OrderStore>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns `(name, factory)` pairs used by the engine builder to resolve the
/// names found in `[storage.implementations]`.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{memory, postgres};

	vec![
		(memory::Registry::NAME, memory::Registry::factory()),
		(postgres::Registry::NAME, postgres::Registry::factory()),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["memory", "postgres"]);
	}

	#[test]
	fn test_factories_validate_config() {
		let empty = toml::Value::Table(toml::map::Map::new());
		for (name, factory) in get_all_implementations() {
			let result = factory(&empty);
			match name {
				"memory" => assert!(result.is_ok()),
				// database_url is required
				"postgres" => assert!(matches!(result, Err(StorageError::Configuration(_)))),
				other => panic!("unexpected implementation {other}"),
			}
		}
	}
}
