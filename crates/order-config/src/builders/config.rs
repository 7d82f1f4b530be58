//! Configuration builder for creating test and development configurations.

use crate::{ApiConfig, Config, ServiceConfig, StorageConfig};
use std::collections::HashMap;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults to a single in-memory storage backend.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	service_name: String,
	storage_primary: String,
	storage_implementations: HashMap<String, toml::Value>,
	api: ApiConfig,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		let mut storage_implementations = HashMap::new();
		storage_implementations.insert(
			"memory".to_string(),
			toml::Value::Table(toml::map::Map::new()),
		);

		Self {
			service_name: "test-order-service".to_string(),
			storage_primary: "memory".to_string(),
			storage_implementations,
			api: ApiConfig::default(),
		}
	}

	pub fn service_name(mut self, name: impl Into<String>) -> Self {
		self.service_name = name.into();
		self
	}

	/// Sets the primary storage implementation.
	pub fn storage_primary(mut self, primary: impl Into<String>) -> Self {
		self.storage_primary = primary.into();
		self
	}

	/// Adds (or replaces) a storage implementation table.
	pub fn storage_implementation(mut self, name: impl Into<String>, config: toml::Value) -> Self {
		self.storage_implementations.insert(name.into(), config);
		self
	}

	pub fn api(mut self, api: ApiConfig) -> Self {
		self.api = api;
		self
	}

	/// Builds the `Config` without running validation.
	pub fn build(self) -> Config {
		Config {
			service: ServiceConfig {
				name: self.service_name,
			},
			storage: StorageConfig {
				primary: self.storage_primary,
				implementations: self.storage_implementations,
			},
			api: self.api,
		}
	}
}
