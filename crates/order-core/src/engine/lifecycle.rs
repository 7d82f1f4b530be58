//! Lifecycle management for the order engine.
//!
//! Handles initialization and shutdown procedures, preparing the store
//! before the first request is served.

use super::OrderEngine;
use crate::OrderError;

impl OrderEngine {
	/// Prepares the store (schema migrations) before serving requests.
	pub async fn initialize(&self) -> Result<(), OrderError> {
		tracing::info!("Initializing order engine");
		self.store
			.initialize()
			.await
			.map_err(|e| OrderError::Persistence(e.to_string()))
	}

	/// Performs cleanup operations
	pub async fn shutdown(&self) -> Result<(), OrderError> {
		tracing::info!("Shutting down order engine");
		Ok(())
	}
}
