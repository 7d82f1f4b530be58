//! API types for the order service HTTP API.
//!
//! This module defines the request and response bodies of the `/orders`
//! endpoints and the structured error type returned by every handler.

use crate::{NewOrderItem, Order, OrderStatus};
use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default page size for list requests without a `limit`.
pub const DEFAULT_LIST_LIMIT: u32 = 10;
/// Upper bound applied to `limit` before it reaches the engine.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Request body for `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	pub user_id: String,
	pub shipping_address: String,
	pub items: Vec<NewOrderItem>,
}

/// Request body for `PUT /orders/{id}/status`.
///
/// The status is kept as a string so unknown values can be reported with a
/// validation message instead of a generic body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
	pub status: String,
}

/// Query string for `GET /orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
	pub user_id: Option<String>,
	pub limit: Option<u32>,
	pub offset: Option<u64>,
}

impl ListOrdersQuery {
	/// Returns the requested limit, defaulted and capped at `MAX_LIST_LIMIT`.
	///
	/// A limit of zero is passed through and yields an empty page.
	pub fn effective_limit(&self) -> u32 {
		self.limit
			.unwrap_or(DEFAULT_LIST_LIMIT)
			.min(MAX_LIST_LIMIT)
	}

	pub fn effective_offset(&self) -> u64 {
		self.offset.unwrap_or(0)
	}

	/// Returns the user filter, treating an empty value as absent.
	pub fn user_filter(&self) -> Option<&str> {
		self.user_id.as_deref().filter(|id| !id.is_empty())
	}
}

/// Response body for `GET /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdersResponse {
	pub orders: Vec<Order>,
	pub limit: u32,
	pub offset: u64,
}

/// Response body for the health and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
	pub status: String,
	pub service: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/// API error response.
///
/// Transition failures carry the current status, the requested status and
/// the statuses that would have been accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Short error title
	pub error: String,
	/// Human-readable description
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub current_status: Option<OrderStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub requested: Option<OrderStatus>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub allowed: Option<Vec<OrderStatus>>,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			..Default::default()
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Bad request: validation or transition failure (400)
	BadRequest(ErrorResponse),
	/// Order does not exist (404)
	NotFound(ErrorResponse),
	/// Internal server error (500)
	InternalServerError(ErrorResponse),
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			APIError::BadRequest(_) => StatusCode::BAD_REQUEST,
			APIError::NotFound(_) => StatusCode::NOT_FOUND,
			APIError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Borrow the JSON body of this error.
	pub fn body(&self) -> &ErrorResponse {
		match self {
			APIError::BadRequest(body)
			| APIError::NotFound(body)
			| APIError::InternalServerError(body) => body,
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let body = self.body();
		match &body.message {
			Some(message) => write!(f, "{}: {}", body.error, message),
			None => write!(f, "{}", body.error),
		}
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let body = match self {
			APIError::BadRequest(body)
			| APIError::NotFound(body)
			| APIError::InternalServerError(body) => body,
		};
		(status, Json(body)).into_response()
	}
}
