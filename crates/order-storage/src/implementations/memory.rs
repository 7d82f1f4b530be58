//! In-memory storage backend implementation for the order service.
//!
//! This module provides a memory-based implementation of the OrderStore
//! trait, useful for testing and development scenarios where persistence is
//! not required. It honours the same contract as the relational backend:
//! atomic creation, newest-first listings with a deterministic tie-break,
//! and blind status updates.

use crate::{OrderStore, StorageError, StorageFactory, StorageRegistry};
use async_trait::async_trait;
use chrono::Utc;
use order_types::{
	ConfigSchema, ImplementationRegistry, NewOrder, Order, OrderItem, OrderStatus, Page,
	PaymentStatus, Schema, ValidationError,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An order together with its insertion sequence number.
///
/// The sequence breaks ties between orders created within the same clock tick.
#[derive(Debug, Clone)]
struct StoredOrder {
	seq: u64,
	order: Order,
}

#[derive(Debug, Default)]
struct MemoryState {
	next_seq: u64,
	orders: HashMap<Uuid, StoredOrder>,
}

/// In-memory order store.
///
/// Orders are kept in a HashMap behind a read-write lock. A create call
/// builds the complete order (items included) before taking the write lock,
/// so readers can never observe a partially written order.
pub struct MemoryStorage {
	state: Arc<RwLock<MemoryState>>,
}

impl MemoryStorage {
	/// Creates a new MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			state: Arc::new(RwLock::new(MemoryState::default())),
		}
	}

	/// Returns the orders matching `filter`, newest first, within `page`.
	async fn list_where<F>(&self, page: Page, filter: F) -> Vec<Order>
	where
		F: Fn(&Order) -> bool,
	{
		let state = self.state.read().await;
		let mut matching: Vec<&StoredOrder> = state
			.orders
			.values()
			.filter(|stored| filter(&stored.order))
			.collect();

		matching.sort_by(|a, b| {
			b.order
				.created_at
				.cmp(&a.order.created_at)
				.then_with(|| b.seq.cmp(&a.seq))
		});

		let offset = usize::try_from(page.offset.max(0)).unwrap_or(usize::MAX);
		let limit = usize::try_from(page.limit.max(0)).unwrap_or(usize::MAX);

		matching
			.into_iter()
			.skip(offset)
			.take(limit)
			.map(|stored| without_items(&stored.order))
			.collect()
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

fn without_items(order: &Order) -> Order {
	Order {
		items: Vec::new(),
		..order.clone()
	}
}

#[async_trait]
impl OrderStore for MemoryStorage {
	async fn create_order(&self, new_order: NewOrder) -> Result<Order, StorageError> {
		let now = Utc::now();
		let order_id = Uuid::new_v4();

		let items = new_order
			.items
			.into_iter()
			.map(|item| OrderItem {
				id: Uuid::new_v4(),
				order_id,
				product_id: item.product_id,
				quantity: item.quantity,
				price: item.price,
				created_at: now,
			})
			.collect();

		let order = Order {
			id: order_id,
			user_id: new_order.user_id,
			total_amount: new_order.total_amount,
			status: OrderStatus::Pending,
			payment_status: PaymentStatus::Pending,
			shipping_address: new_order.shipping_address,
			items,
			created_at: now,
			updated_at: now,
		};

		let mut state = self.state.write().await;
		let seq = state.next_seq;
		state.next_seq += 1;
		state.orders.insert(
			order_id,
			StoredOrder {
				seq,
				order: order.clone(),
			},
		);

		Ok(order)
	}

	async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StorageError> {
		let state = self.state.read().await;
		Ok(state.orders.get(&id).map(|stored| stored.order.clone()))
	}

	async fn list_orders_by_user(
		&self,
		user_id: &str,
		page: Page,
	) -> Result<Vec<Order>, StorageError> {
		Ok(self
			.list_where(page, |order| order.user_id == user_id)
			.await)
	}

	async fn list_orders(&self, page: Page) -> Result<Vec<Order>, StorageError> {
		Ok(self.list_where(page, |_| true).await)
	}

	async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, StorageError> {
		let mut state = self.state.write().await;
		let stored = state
			.orders
			.get_mut(&id)
			.ok_or_else(|| StorageError::NotFound(id.to_string()))?;

		stored.order.status = status;
		stored.order.updated_at = Utc::now();

		Ok(without_items(&stored.order))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage has no required configuration
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - None required for memory storage
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn OrderStore>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use order_types::NewOrderItem;
	use rust_decimal::Decimal;

	fn new_order(user_id: &str) -> NewOrder {
		NewOrder {
			user_id: user_id.to_string(),
			shipping_address: "1 Main St".to_string(),
			total_amount: Decimal::new(2500, 2),
			items: vec![
				NewOrderItem {
					product_id: "sku-a".to_string(),
					quantity: 2,
					price: Decimal::new(1000, 2),
				},
				NewOrderItem {
					product_id: "sku-b".to_string(),
					quantity: 1,
					price: Decimal::new(500, 2),
				},
			],
		}
	}

	#[tokio::test]
	async fn test_create_and_get() {
		let storage = MemoryStorage::new();

		let created = storage.create_order(new_order("user-1")).await.unwrap();
		assert_eq!(created.status, OrderStatus::Pending);
		assert_eq!(created.payment_status, PaymentStatus::Pending);
		assert_eq!(created.total_amount, Decimal::new(2500, 2));
		assert_eq!(created.items.len(), 2);
		assert_eq!(created.items[0].product_id, "sku-a");
		assert_eq!(created.items[1].product_id, "sku-b");
		assert!(created.items.iter().all(|item| item.order_id == created.id));
		assert_ne!(created.items[0].id, created.items[1].id);

		let fetched = storage.get_order(created.id).await.unwrap().unwrap();
		assert_eq!(fetched, created);
	}

	#[tokio::test]
	async fn test_get_missing_returns_none() {
		let storage = MemoryStorage::new();
		assert!(storage.get_order(Uuid::new_v4()).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_list_newest_first_without_items() {
		let storage = MemoryStorage::new();
		let mut ids = Vec::new();
		for _ in 0..5 {
			ids.push(storage.create_order(new_order("user-1")).await.unwrap().id);
		}
		storage.create_order(new_order("user-2")).await.unwrap();

		let listed = storage
			.list_orders_by_user("user-1", Page::new(3, 0))
			.await
			.unwrap();
		let listed_ids: Vec<_> = listed.iter().map(|o| o.id).collect();
		assert_eq!(listed_ids, vec![ids[4], ids[3], ids[2]]);
		assert!(listed.iter().all(|o| o.items.is_empty()));

		let next = storage
			.list_orders_by_user("user-1", Page::new(3, 3))
			.await
			.unwrap();
		let next_ids: Vec<_> = next.iter().map(|o| o.id).collect();
		assert_eq!(next_ids, vec![ids[1], ids[0]]);

		let all = storage.list_orders(Page::new(100, 0)).await.unwrap();
		assert_eq!(all.len(), 6);
		assert_eq!(all[0].user_id, "user-2");
	}

	#[tokio::test]
	async fn test_update_status_is_blind() {
		let storage = MemoryStorage::new();
		let created = storage.create_order(new_order("user-1")).await.unwrap();

		// No transition rules at this layer
		let updated = storage
			.update_status(created.id, OrderStatus::Delivered)
			.await
			.unwrap();
		assert_eq!(updated.status, OrderStatus::Delivered);
		assert!(updated.updated_at >= created.updated_at);

		let fetched = storage.get_order(created.id).await.unwrap().unwrap();
		assert_eq!(fetched.status, OrderStatus::Delivered);
		assert_eq!(fetched.items.len(), 2);
	}

	#[tokio::test]
	async fn test_update_missing_order() {
		let storage = MemoryStorage::new();
		let result = storage
			.update_status(Uuid::new_v4(), OrderStatus::Confirmed)
			.await;
		assert!(matches!(result, Err(StorageError::NotFound(_))));
	}

	#[test]
	fn test_schema_accepts_empty_table() {
		let config = toml::Value::Table(toml::map::Map::new());
		assert!(MemoryStorageSchema.validate(&config).is_ok());
		assert!(create_storage(&config).is_ok());
	}
}
