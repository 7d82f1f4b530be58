//! Order state machine implementation.
//!
//! Orders move forward through Pending -> Confirmed -> Processing -> Shipped
//! -> Delivered, and may be Cancelled while Pending or Confirmed. Delivered
//! and Cancelled are terminal.

use crate::OrderError;
use once_cell::sync::Lazy;
use order_storage::OrderStore;
use order_types::{Order, OrderStatus};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Static transition table - each state maps to allowed next states
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Pending,
		HashSet::from([OrderStatus::Confirmed, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::Confirmed,
		HashSet::from([OrderStatus::Processing, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::Processing,
		HashSet::from([OrderStatus::Shipped]),
	);
	m.insert(OrderStatus::Shipped, HashSet::from([OrderStatus::Delivered]));
	m.insert(OrderStatus::Delivered, HashSet::new()); // terminal
	m.insert(OrderStatus::Cancelled, HashSet::new()); // terminal
	m
});

/// Checks if a state transition is valid.
pub fn is_valid_transition(current: OrderStatus, requested: OrderStatus) -> bool {
	TRANSITIONS
		.get(&current)
		.is_some_and(|set| set.contains(&requested))
}

/// Returns the statuses reachable from `current`, in lifecycle order.
pub fn allowed_transitions(current: OrderStatus) -> Vec<OrderStatus> {
	OrderStatus::all()
		.filter(|next| is_valid_transition(current, *next))
		.collect()
}

/// Applies checked status transitions to orders in the store.
pub struct OrderStateMachine {
	store: Arc<dyn OrderStore>,
}

impl OrderStateMachine {
	pub fn new(store: Arc<dyn OrderStore>) -> Self {
		Self { store }
	}

	/// Gets an order by ID
	pub async fn get_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
		self.store
			.get_order(order_id)
			.await?
			.ok_or_else(|| OrderError::NotFound(order_id.to_string()))
	}

	/// Transitions an order to a new status with validation.
	///
	/// The check runs against a fresh read and the write is unconditional, so
	/// two callers validating against the same read may both succeed; the
	/// last write wins. The returned order keeps the items of that read and
	/// carries the status and `updated_at` as persisted.
	pub async fn transition_order_status(
		&self,
		order_id: Uuid,
		requested: OrderStatus,
	) -> Result<Order, OrderError> {
		let order = self.get_order(order_id).await?;

		if !is_valid_transition(order.status, requested) {
			tracing::warn!(
				order_id = %order_id,
				current = %order.status,
				requested = %requested,
				"Rejected status transition"
			);
			return Err(OrderError::InvalidTransition {
				current: order.status,
				requested,
				allowed: allowed_transitions(order.status),
				message: None,
			});
		}

		let persisted = self.store.update_status(order_id, requested).await?;

		tracing::info!(
			order_id = %order_id,
			from = %order.status,
			to = %persisted.status,
			"Order status changed"
		);

		Ok(Order {
			status: persisted.status,
			updated_at: persisted.updated_at,
			..order
		})
	}
}
