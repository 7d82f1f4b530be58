//! Order API implementation.
//!
//! Handlers for creating, listing and fetching orders and for moving them
//! through the status lifecycle.

use super::api_error;
use crate::server::AppState;
use axum::{
	extract::{
		rejection::{JsonRejection, QueryRejection},
		Path, Query, State,
	},
	http::StatusCode,
	response::Json,
};
use order_core::OrderError;
use order_types::{
	APIError, CreateOrderRequest, ErrorResponse, ListOrdersQuery, ListOrdersResponse, Order,
	OrderStatus, OrderStatusView, Page, UpdateStatusRequest,
};

fn bad_request(message: impl Into<String>) -> APIError {
	APIError::BadRequest(ErrorResponse::new(message))
}

/// Handles POST /orders requests.
pub async fn create_order(
	State(state): State<AppState>,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), APIError> {
	let Json(request) = payload.map_err(|e| bad_request(e.body_text()))?;

	let order = state
		.engine
		.create_order(request)
		.await
		.map_err(|e| api_error(e, "Failed to create order"))?;

	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /orders requests.
///
/// Supports `user_id`, `limit` (default 10, at most 100) and `offset`.
pub async fn list_orders(
	State(state): State<AppState>,
	query: Result<Query<ListOrdersQuery>, QueryRejection>,
) -> Result<Json<ListOrdersResponse>, APIError> {
	let Query(query) = query.map_err(|e| bad_request(e.body_text()))?;

	let limit = query.effective_limit();
	let offset = query.effective_offset();
	let page = Page::new(
		i64::from(limit),
		i64::try_from(offset).map_err(|_| bad_request("offset is too large"))?,
	);

	let orders = state
		.engine
		.list_orders(query.user_filter(), page)
		.await
		.map_err(|e| api_error(e, "Failed to get orders"))?;

	Ok(Json(ListOrdersResponse {
		orders,
		limit,
		offset,
	}))
}

/// Handles GET /orders/{id} requests.
pub async fn get_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Order>, APIError> {
	let order = state
		.engine
		.get_order(&id)
		.await
		.map_err(|e| api_error(e, "Failed to get order"))?;

	Ok(Json(order))
}

/// Handles PUT /orders/{id}/cancel requests.
pub async fn cancel_order(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Order>, APIError> {
	match state.engine.cancel_order(&id).await {
		Ok(order) => Ok(Json(order)),
		Err(OrderError::InvalidTransition {
			current, message, ..
		}) => Err(APIError::BadRequest(ErrorResponse {
			current_status: Some(current),
			message,
			..ErrorResponse::new("Cannot cancel order")
		})),
		Err(e) => Err(api_error(e, "Failed to cancel order")),
	}
}

/// Handles GET /orders/{id}/status requests.
pub async fn get_order_status(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<OrderStatusView>, APIError> {
	let view = state
		.engine
		.order_status(&id)
		.await
		.map_err(|e| api_error(e, "Failed to get order"))?;

	Ok(Json(view))
}

/// Handles PUT /orders/{id}/status requests.
pub async fn update_order_status(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Order>, APIError> {
	let Json(request) = payload.map_err(|e| bad_request(e.body_text()))?;

	let requested = request
		.status
		.parse::<OrderStatus>()
		.map_err(|e| bad_request(e.to_string()))?;

	let order = state
		.engine
		.request_status_change(&id, requested)
		.await
		.map_err(|e| api_error(e, "Failed to update order status"))?;

	Ok(Json(order))
}
