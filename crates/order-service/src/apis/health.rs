//! Health, readiness and metrics endpoints.

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use order_types::HealthResponse;

const METRICS_BODY: &str = "# Order service metrics\norder_service_up 1\n";

/// Handles GET /health requests. Always healthy while the process serves.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "healthy".to_string(),
		service: state.service_name,
		error: None,
	})
}

/// Handles GET /ready requests by probing the store.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
	match state.engine.health_check().await {
		Ok(()) => (
			StatusCode::OK,
			Json(HealthResponse {
				status: "ready".to_string(),
				service: state.service_name,
				error: None,
			}),
		),
		Err(e) => {
			tracing::warn!(error = %e, "Readiness check failed");
			(
				StatusCode::SERVICE_UNAVAILABLE,
				Json(HealthResponse {
					status: "not ready".to_string(),
					service: state.service_name,
					error: Some("database connection failed".to_string()),
				}),
			)
		},
	}
}

/// Handles GET /metrics requests.
pub async fn metrics() -> &'static str {
	METRICS_BODY
}
