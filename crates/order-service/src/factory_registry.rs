//! Dynamic factory registry for storage implementations.
//!
//! This module provides a centralized registry of backend factories,
//! allowing the store to be instantiated from the name used in
//! `[storage.implementations]`.

use order_config::Config;
use order_core::{OrderEngine, OrderEngineBuilder, OrderFactories};
use order_storage::StorageFactory;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Global registry for all implementation factories
pub struct FactoryRegistry {
	pub storage: HashMap<String, StorageFactory>,
}

impl FactoryRegistry {
	/// Create a new empty registry
	pub fn new() -> Self {
		Self {
			storage: HashMap::new(),
		}
	}

	/// Register a storage implementation
	pub fn register_storage(&mut self, name: impl Into<String>, factory: StorageFactory) {
		self.storage.insert(name.into(), factory);
	}
}

// Global registry instance
static REGISTRY: OnceLock<FactoryRegistry> = OnceLock::new();

/// Initialize the global registry with all available implementations
pub fn initialize_registry() -> &'static FactoryRegistry {
	REGISTRY.get_or_init(|| {
		let mut registry = FactoryRegistry::new();

		for (name, factory) in order_storage::get_all_implementations() {
			tracing::debug!("Registering storage implementation: {}", name);
			registry.register_storage(name, factory);
		}

		registry
	})
}

/// Macro to build factories from config implementations
macro_rules! build_factories {
	($registry:expr, $config_impls:expr, $registry_field:ident, $type_name:literal) => {{
		let mut factories = HashMap::new();
		for name in $config_impls.keys() {
			if let Some(factory) = $registry.$registry_field.get(name) {
				factories.insert(name.clone(), *factory);
			} else {
				let mut available: Vec<_> = $registry.$registry_field.keys().cloned().collect();
				available.sort();
				return Err(format!(
					"Unknown {} implementation '{}'. Available: [{}]",
					$type_name,
					name,
					available.join(", ")
				)
				.into());
			}
		}
		factories
	}};
}

/// Build the order engine using the registry and config
pub fn build_engine_from_config(config: Config) -> Result<OrderEngine, Box<dyn std::error::Error>> {
	let registry = initialize_registry();

	let storage_factories =
		build_factories!(registry, config.storage.implementations, storage, "storage");

	let builder = OrderEngineBuilder::new(config);
	Ok(builder.build(OrderFactories { storage_factories })?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_config::ConfigBuilder;

	#[test]
	fn test_registry_contains_backends() {
		let registry = initialize_registry();
		assert!(registry.storage.contains_key("memory"));
		assert!(registry.storage.contains_key("postgres"));
	}

	#[tokio::test]
	async fn test_build_engine_with_memory_config() {
		let config = ConfigBuilder::new().build();
		let engine = build_engine_from_config(config).unwrap();
		assert!(engine.health_check().await.is_ok());
	}

	#[test]
	fn test_unknown_implementation_rejected() {
		let config = ConfigBuilder::new()
			.storage_implementation("file", toml::Value::Table(toml::map::Map::new()))
			.build();
		let err = build_engine_from_config(config).err().unwrap();
		assert_eq!(
			err.to_string(),
			"Unknown storage implementation 'file'. Available: [memory, postgres]"
		);
	}

	#[tokio::test]
	async fn test_build_engine_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.toml");
		std::fs::write(
			&path,
			r#"
[service]
name = "orders-test"

[storage]
primary = "memory"
[storage.implementations.memory]
"#,
		)
		.unwrap();

		let config = Config::from_file(&path).await.unwrap();
		assert_eq!(config.service.name, "orders-test");
		assert!(build_engine_from_config(config).is_ok());
	}
}
