//! HTTP server for the order service API.
//!
//! This module wires the order, health and metrics endpoints into an axum
//! router with request tracing, permissive CORS, a per-request deadline and
//! a body size limit.

use crate::apis::{health, orders};
use axum::{
	extract::DefaultBodyLimit,
	routing::{get, put},
	Router,
};
use order_config::ApiConfig;
use order_core::OrderEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the order engine for processing requests.
	pub engine: Arc<OrderEngine>,
	/// Name reported by the health and readiness probes.
	pub service_name: String,
}

/// Builds the application router.
pub fn router(state: AppState, api_config: &ApiConfig) -> Router {
	Router::new()
		.route(
			"/orders",
			get(orders::list_orders).post(orders::create_order),
		)
		.route("/orders/{id}", get(orders::get_order))
		.route("/orders/{id}/cancel", put(orders::cancel_order))
		.route(
			"/orders/{id}/status",
			get(orders::get_order_status).put(orders::update_order_status),
		)
		.route("/health", get(health::health))
		.route("/ready", get(health::ready))
		.route("/metrics", get(health::metrics))
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive())
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				)))
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		.with_state(state)
}

/// Starts the HTTP server and runs it until Ctrl+C is received.
///
/// In-flight requests are allowed to finish before this returns.
pub async fn start_server(
	api_config: ApiConfig,
	service_name: String,
	engine: Arc<OrderEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState {
		engine,
		service_name,
	};
	let app = router(app_state, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Order service API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "Failed to listen for shutdown signal");
		return;
	}
	tracing::info!("Shutdown signal received");
}
