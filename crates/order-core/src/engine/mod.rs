//! Order engine exposing the lifecycle operations used by the HTTP layer.
//!
//! The engine holds no mutable state of its own; it is shared behind an
//! `Arc` and every call goes straight to the configured store.

use crate::state::OrderStateMachine;
use crate::validation::validate_create_request;
use crate::OrderError;
use order_storage::OrderStore;
use order_types::{CreateOrderRequest, Order, OrderStatus, OrderStatusView, Page};
use std::sync::Arc;
use uuid::Uuid;

pub mod lifecycle;

/// Explanation attached to rejected cancellations.
pub const CANCEL_REJECTED_MESSAGE: &str = "Order can only be cancelled when pending or confirmed";

/// Entry point for all order operations.
pub struct OrderEngine {
	store: Arc<dyn OrderStore>,
	state_machine: OrderStateMachine,
}

/// Parses an order id; ids that are not UUIDs cannot exist.
fn parse_order_id(id: &str) -> Result<Uuid, OrderError> {
	Uuid::parse_str(id).map_err(|_| OrderError::NotFound(id.to_string()))
}

impl OrderEngine {
	pub fn new(store: Arc<dyn OrderStore>) -> Self {
		Self {
			state_machine: OrderStateMachine::new(store.clone()),
			store,
		}
	}

	/// Validates the request, computes the total and persists the order.
	pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
		let new_order = validate_create_request(request)?;
		let order = self.store.create_order(new_order).await?;

		tracing::info!(
			order_id = %order.id,
			user_id = %order.user_id,
			total = %order.total_amount,
			items = order.items.len(),
			"Order created"
		);
		Ok(order)
	}

	/// Gets an order with its items.
	pub async fn get_order(&self, id: &str) -> Result<Order, OrderError> {
		let order_id = parse_order_id(id)?;
		tracing::debug!(order_id = %order_id, "Fetching order");
		self.state_machine.get_order(order_id).await
	}

	/// Lists orders newest first, optionally restricted to one user.
	pub async fn list_orders(
		&self,
		user_id: Option<&str>,
		page: Page,
	) -> Result<Vec<Order>, OrderError> {
		tracing::debug!(user_id = ?user_id, limit = page.limit, offset = page.offset, "Listing orders");
		let orders = match user_id {
			Some(user_id) => self.store.list_orders_by_user(user_id, page).await?,
			None => self.store.list_orders(page).await?,
		};
		Ok(orders)
	}

	/// Cancels an order that is still pending or confirmed.
	pub async fn cancel_order(&self, id: &str) -> Result<Order, OrderError> {
		let order_id = parse_order_id(id)?;

		self.state_machine
			.transition_order_status(order_id, OrderStatus::Cancelled)
			.await
			.map_err(|err| match err {
				OrderError::InvalidTransition {
					current,
					requested,
					allowed,
					..
				} => OrderError::InvalidTransition {
					current,
					requested,
					allowed,
					message: Some(CANCEL_REJECTED_MESSAGE.to_string()),
				},
				other => other,
			})
	}

	/// Moves an order to `requested` if the transition table allows it.
	pub async fn request_status_change(
		&self,
		id: &str,
		requested: OrderStatus,
	) -> Result<Order, OrderError> {
		let order_id = parse_order_id(id)?;
		self.state_machine
			.transition_order_status(order_id, requested)
			.await
	}

	/// Returns the compact status view of an order.
	pub async fn order_status(&self, id: &str) -> Result<OrderStatusView, OrderError> {
		let order = self.get_order(id).await?;
		Ok(OrderStatusView::from(&order))
	}

	/// Probes the store.
	pub async fn health_check(&self) -> Result<(), OrderError> {
		self.store
			.health_check()
			.await
			.map_err(|e| OrderError::Persistence(e.to_string()))
	}
}
