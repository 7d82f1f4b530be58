//! Main entry point for the order service.
//!
//! This binary serves the order lifecycle over HTTP: it creates orders
//! together with their items, lists and fetches them, and moves them
//! through the status lifecycle. The storage backend is chosen by name in
//! the configuration file.

use clap::Parser;
use order_config::Config;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod factory_registry;
mod server;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds and initializes the order engine
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	// Create env filter with default from args
	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started order service");

	// Load configuration
	let config = Config::from_file(&args.config).await?;
	tracing::info!(
		"Loaded configuration [{}] with storage '{}'",
		config.service.name,
		config.storage.primary
	);

	let engine = factory_registry::build_engine_from_config(config.clone())?;
	let engine = Arc::new(engine);
	engine.initialize().await?;

	server::start_server(config.api.clone(), config.service.name.clone(), Arc::clone(&engine))
		.await?;

	engine.shutdown().await?;
	tracing::info!("Stopped order service");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["order-service"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from([
			"order-service",
			"--config",
			"custom.toml",
			"--log-level",
			"debug",
		]);
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
	}
}
