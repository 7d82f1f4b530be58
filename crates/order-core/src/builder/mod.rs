//! Builder pattern for constructing order engines.
//!
//! Composes an OrderEngine from the storage implementation named in the
//! configuration, using factory functions registered by name.

use crate::engine::OrderEngine;
use order_config::Config;
use order_storage::{OrderStore, StorageError};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during order engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Container for the factory functions needed to build an OrderEngine.
///
/// Each factory takes the TOML table of its implementation and returns the
/// corresponding backend.
pub struct OrderFactories<SF> {
	pub storage_factories: HashMap<String, SF>,
}

/// Builder for constructing an OrderEngine with a pluggable store.
pub struct OrderEngineBuilder {
	config: Config,
}

impl OrderEngineBuilder {
	/// Creates a new OrderEngineBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the OrderEngine from the configured storage implementations.
	///
	/// Every configured implementation must have a registered factory. Each
	/// factory validates its own table before creating the backend, and the
	/// primary one becomes the engine's store.
	pub fn build<SF>(self, factories: OrderFactories<SF>) -> Result<OrderEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn OrderStore>, StorageError>,
	{
		let mut storage_impls = HashMap::new();
		for (name, config) in &self.config.storage.implementations {
			let Some(factory) = factories.storage_factories.get(name) else {
				let mut available: Vec<_> = factories.storage_factories.keys().cloned().collect();
				available.sort();
				return Err(BuilderError::Config(format!(
					"Unknown storage implementation '{}' (available: {})",
					name,
					available.join(", ")
				)));
			};

			match factory(config) {
				Ok(implementation) => {
					// Validation already happened in the factory
					storage_impls.insert(name.clone(), implementation);
					let is_primary = &self.config.storage.primary == name;
					tracing::info!(component = "storage", implementation = %name, enabled = %is_primary, "Loaded");
				},
				Err(e) => {
					tracing::error!(
						component = "storage",
						implementation = %name,
						error = %e,
						"Failed to create storage implementation"
					);
					return Err(BuilderError::Config(format!(
						"Failed to create storage implementation '{}': {}",
						name, e
					)));
				},
			}
		}

		let primary_storage = &self.config.storage.primary;
		let store = storage_impls.remove(primary_storage).ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' failed to load or has invalid configuration",
				primary_storage
			))
		})?;

		Ok(OrderEngine::new(Arc::from(store)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_config::ConfigBuilder;
	use order_storage::{get_all_implementations, StorageFactory};

	fn all_factories() -> OrderFactories<StorageFactory> {
		OrderFactories {
			storage_factories: get_all_implementations()
				.into_iter()
				.map(|(name, factory)| (name.to_string(), factory))
				.collect(),
		}
	}

	#[tokio::test]
	async fn test_build_with_memory_store() {
		let config = ConfigBuilder::new().build();
		let engine = OrderEngineBuilder::new(config).build(all_factories()).unwrap();
		assert!(engine.health_check().await.is_ok());
	}

	#[test]
	fn test_unknown_implementation_lists_available() {
		let config = ConfigBuilder::new()
			.storage_implementation("redis", toml::Value::Table(toml::map::Map::new()))
			.build();
		let err = OrderEngineBuilder::new(config)
			.build(all_factories())
			.err()
			.unwrap();
		let msg = err.to_string();
		assert!(msg.contains("'redis'"), "{msg}");
		assert!(msg.contains("memory, postgres"), "{msg}");
	}

	#[test]
	fn test_invalid_backend_config_rejected() {
		// database_url is required
		let config = ConfigBuilder::new()
			.storage_primary("postgres")
			.storage_implementation("postgres", toml::Value::Table(toml::map::Map::new()))
			.build();
		let err = OrderEngineBuilder::new(config)
			.build(all_factories())
			.err()
			.unwrap();
		assert!(err.to_string().contains("database_url"));
	}

	#[test]
	fn test_primary_without_config_rejected() {
		let config = ConfigBuilder::new().storage_primary("postgres").build();
		let err = OrderEngineBuilder::new(config)
			.build(all_factories())
			.err()
			.unwrap();
		assert!(err.to_string().contains("Primary storage 'postgres'"));
	}
}
