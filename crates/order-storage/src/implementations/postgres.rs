//! PostgreSQL storage backend implementation for the order service.
//!
//! Orders live in an `orders` table and their line items in `order_items`.
//! Creation runs inside a single transaction so an order never becomes
//! visible without its items. The schema is managed by the SQL migrations
//! shipped with this crate.

use crate::{OrderStore, StorageError, StorageFactory, StorageRegistry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use order_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, NewOrder, Order, OrderItem,
	OrderStatus, Page, PaymentStatus, Schema, ValidationError,
};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECONDS: u64 = 5;

const ORDER_COLUMNS: &str =
	"id, user_id, total_amount, status, payment_status, shipping_address, created_at, updated_at";

/// Raw `orders` row as returned by the database.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
	id: Uuid,
	user_id: String,
	total_amount: Decimal,
	status: String,
	payment_status: String,
	shipping_address: String,
	created_at: DateTime<Utc>,
	updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
	type Error = StorageError;

	fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
		let status = row
			.status
			.parse::<OrderStatus>()
			.map_err(|e| StorageError::Backend(format!("order {}: {}", row.id, e)))?;
		let payment_status = row
			.payment_status
			.parse::<PaymentStatus>()
			.map_err(|e| StorageError::Backend(format!("order {}: {}", row.id, e)))?;

		Ok(Order {
			id: row.id,
			user_id: row.user_id,
			total_amount: row.total_amount,
			status,
			payment_status,
			shipping_address: row.shipping_address,
			items: Vec::new(),
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

/// Raw `order_items` row as returned by the database.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
	id: Uuid,
	order_id: Uuid,
	product_id: String,
	quantity: i32,
	price: Decimal,
	created_at: DateTime<Utc>,
}

impl From<ItemRow> for OrderItem {
	fn from(row: ItemRow) -> Self {
		OrderItem {
			id: row.id,
			order_id: row.order_id,
			product_id: row.product_id,
			quantity: row.quantity,
			price: row.price,
			created_at: row.created_at,
		}
	}
}

fn backend(err: sqlx::Error) -> StorageError {
	StorageError::Backend(err.to_string())
}

fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, StorageError> {
	rows.into_iter().map(Order::try_from).collect()
}

/// PostgreSQL order store backed by a sqlx connection pool.
pub struct PostgresStorage {
	pool: PgPool,
	run_migrations: bool,
}

impl PostgresStorage {
	/// Wraps an existing connection pool.
	pub fn new(pool: PgPool, run_migrations: bool) -> Self {
		Self {
			pool,
			run_migrations,
		}
	}

	async fn get_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StorageError> {
		let rows: Vec<ItemRow> = sqlx::query_as(
			"SELECT id, order_id, product_id, quantity, price, created_at \
			 FROM order_items WHERE order_id = $1 ORDER BY position",
		)
		.bind(order_id)
		.fetch_all(&self.pool)
		.await
		.map_err(backend)?;

		Ok(rows.into_iter().map(OrderItem::from).collect())
	}
}

#[async_trait]
impl OrderStore for PostgresStorage {
	async fn initialize(&self) -> Result<(), StorageError> {
		if !self.run_migrations {
			tracing::debug!("Skipping order schema migrations");
			return Ok(());
		}

		sqlx::migrate!("./migrations")
			.run(&self.pool)
			.await
			.map_err(|e| StorageError::Backend(format!("Migration failed: {}", e)))?;
		tracing::info!("Order schema migrations applied");
		Ok(())
	}

	async fn create_order(&self, new_order: NewOrder) -> Result<Order, StorageError> {
		let mut tx = self.pool.begin().await.map_err(backend)?;

		let row: OrderRow = sqlx::query_as(&format!(
			"INSERT INTO orders (user_id, total_amount, status, payment_status, shipping_address) \
			 VALUES ($1, $2, $3, $4, $5) RETURNING {}",
			ORDER_COLUMNS
		))
		.bind(&new_order.user_id)
		.bind(new_order.total_amount)
		.bind(OrderStatus::Pending.as_str())
		.bind(PaymentStatus::Pending.as_str())
		.bind(&new_order.shipping_address)
		.fetch_one(&mut *tx)
		.await
		.map_err(backend)?;

		let mut order = Order::try_from(row)?;

		for (position, item) in new_order.items.iter().enumerate() {
			let position = i32::try_from(position)
				.map_err(|_| StorageError::Backend("Too many order items".to_string()))?;

			let item_row: ItemRow = sqlx::query_as(
				"INSERT INTO order_items (order_id, position, product_id, quantity, price) \
				 VALUES ($1, $2, $3, $4, $5) \
				 RETURNING id, order_id, product_id, quantity, price, created_at",
			)
			.bind(order.id)
			.bind(position)
			.bind(&item.product_id)
			.bind(item.quantity)
			.bind(item.price)
			.fetch_one(&mut *tx)
			.await
			.map_err(backend)?;

			order.items.push(item_row.into());
		}

		// Dropping an uncommitted transaction rolls it back
		tx.commit().await.map_err(backend)?;

		tracing::debug!(order_id = %order.id, items = order.items.len(), "Order persisted");
		Ok(order)
	}

	async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StorageError> {
		let row: Option<OrderRow> = sqlx::query_as(&format!(
			"SELECT {} FROM orders WHERE id = $1",
			ORDER_COLUMNS
		))
		.bind(id)
		.fetch_optional(&self.pool)
		.await
		.map_err(backend)?;

		let Some(row) = row else {
			return Ok(None);
		};

		let mut order = Order::try_from(row)?;
		order.items = self.get_items(id).await?;
		Ok(Some(order))
	}

	async fn list_orders_by_user(
		&self,
		user_id: &str,
		page: Page,
	) -> Result<Vec<Order>, StorageError> {
		let rows: Vec<OrderRow> = sqlx::query_as(&format!(
			"SELECT {} FROM orders WHERE user_id = $1 \
			 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
			ORDER_COLUMNS
		))
		.bind(user_id)
		.bind(page.limit)
		.bind(page.offset)
		.fetch_all(&self.pool)
		.await
		.map_err(backend)?;

		into_orders(rows)
	}

	async fn list_orders(&self, page: Page) -> Result<Vec<Order>, StorageError> {
		let rows: Vec<OrderRow> = sqlx::query_as(&format!(
			"SELECT {} FROM orders ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
			ORDER_COLUMNS
		))
		.bind(page.limit)
		.bind(page.offset)
		.fetch_all(&self.pool)
		.await
		.map_err(backend)?;

		into_orders(rows)
	}

	async fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, StorageError> {
		let row: Option<OrderRow> = sqlx::query_as(&format!(
			"UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
			ORDER_COLUMNS
		))
		.bind(status.as_str())
		.bind(id)
		.fetch_optional(&self.pool)
		.await
		.map_err(backend)?;

		match row {
			Some(row) => Order::try_from(row),
			None => Err(StorageError::NotFound(id.to_string())),
		}
	}

	async fn health_check(&self) -> Result<(), StorageError> {
		sqlx::query("SELECT 1")
			.execute(&self.pool)
			.await
			.map_err(backend)?;
		Ok(())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(PostgresStorageSchema)
	}
}

/// Configuration schema for PostgresStorage.
pub struct PostgresStorageSchema;

impl ConfigSchema for PostgresStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("database_url", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url)
							if url.starts_with("postgres://")
								|| url.starts_with("postgresql://") =>
						{
							Ok(())
						},
						_ => Err("must start with postgres:// or postgresql://".to_string()),
					}
				}),
			],
			vec![
				Field::new(
					"max_connections",
					FieldType::Integer {
						min: Some(1),
						max: Some(100),
					},
				),
				Field::new(
					"acquire_timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
				Field::new("run_migrations", FieldType::Boolean),
			],
		);

		schema.validate(config)
	}
}

/// Factory function to create a PostgreSQL storage backend from configuration.
///
/// Configuration parameters:
/// - `database_url`: connection string (required)
/// - `max_connections`: pool size (default: 10)
/// - `acquire_timeout_seconds`: wait for a pooled connection (default: 5)
/// - `run_migrations`: apply migrations on initialization (default: true)
///
/// The pool connects lazily, so an unreachable database is reported by the
/// readiness probe rather than at startup. Must be called within a tokio
/// runtime.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn OrderStore>, StorageError> {
	PostgresStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let database_url = config
		.get("database_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| StorageError::Configuration("database_url is required".to_string()))?;

	let max_connections = config
		.get("max_connections")
		.and_then(|v| v.as_integer())
		.and_then(|v| u32::try_from(v).ok())
		.unwrap_or(DEFAULT_MAX_CONNECTIONS);

	let acquire_timeout = config
		.get("acquire_timeout_seconds")
		.and_then(|v| v.as_integer())
		.and_then(|v| u64::try_from(v).ok())
		.unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECONDS);

	let run_migrations = config
		.get("run_migrations")
		.and_then(|v| v.as_bool())
		.unwrap_or(true);

	let pool = PgPoolOptions::new()
		.max_connections(max_connections)
		.acquire_timeout(Duration::from_secs(acquire_timeout))
		.connect_lazy(database_url)
		.map_err(|e| StorageError::Configuration(format!("Invalid database_url: {}", e)))?;

	Ok(Box::new(PostgresStorage::new(pool, run_migrations)))
}

/// Registry for the PostgreSQL storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "postgres";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
