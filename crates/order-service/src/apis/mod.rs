//! Order service API handlers.
//!
//! Each submodule holds the handlers for one group of endpoints. Lifecycle
//! errors are translated into HTTP responses here.

pub mod health;
pub mod orders;

use order_core::OrderError;
use order_types::{APIError, ErrorResponse};

/// Converts a lifecycle error into an API error.
///
/// Persistence failures are logged with their cause and reported to the
/// client only as `failure`.
pub fn api_error(err: OrderError, failure: &str) -> APIError {
	match err {
		OrderError::Validation(message) => APIError::BadRequest(ErrorResponse::new(message)),
		OrderError::NotFound(_) => APIError::NotFound(ErrorResponse::new("Order not found")),
		OrderError::InvalidTransition {
			current,
			requested,
			allowed,
			message,
		} => APIError::BadRequest(ErrorResponse {
			current_status: Some(current),
			requested: Some(requested),
			allowed: Some(allowed),
			message,
			..ErrorResponse::new("Invalid status transition")
		}),
		OrderError::Persistence(cause) => {
			tracing::error!(error = %cause, "{}", failure);
			APIError::InternalServerError(ErrorResponse::new(failure))
		},
	}
}
