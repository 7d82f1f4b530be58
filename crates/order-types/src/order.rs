//! Order types for the order service.
//!
//! This module defines the persisted order and line item records, the closed
//! status enumerations that govern them, and the payloads used to create and
//! page through orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// A single customer purchase.
///
/// An order is created together with all of its line items and afterwards
/// only its `status` (and `updated_at`) ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier assigned by the store.
	pub id: Uuid,
	/// Identifier of the user that owns this order.
	pub user_id: String,
	/// Sum of price × quantity over all items, computed at creation.
	#[serde(with = "rust_decimal::serde::float")]
	pub total_amount: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Payment status. Only the initial value is managed here.
	pub payment_status: PaymentStatus,
	/// Free-form shipping address.
	pub shipping_address: String,
	/// Line items in the order they were submitted.
	///
	/// Left empty by list operations.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub items: Vec<OrderItem>,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
	/// Timestamp of the last status change.
	pub updated_at: DateTime<Utc>,
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
	pub id: Uuid,
	pub order_id: Uuid,
	pub product_id: String,
	pub quantity: i32,
	#[serde(with = "rust_decimal::serde::float")]
	pub price: Decimal,
	pub created_at: DateTime<Utc>,
}

/// A line item as submitted by the caller, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
	pub product_id: String,
	pub quantity: i32,
	pub price: Decimal,
}

impl NewOrderItem {
	/// Returns price × quantity for this line, or `None` on overflow.
	pub fn line_total(&self) -> Option<Decimal> {
		self.price.checked_mul(Decimal::from(self.quantity))
	}
}

/// A validated order ready to be written by a store.
///
/// The total is computed by the lifecycle engine; stores persist it unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
	pub user_id: String,
	pub shipping_address: String,
	pub total_amount: Decimal,
	pub items: Vec<NewOrderItem>,
}

/// Limit/offset window for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub limit: i64,
	pub offset: i64,
}

impl Page {
	pub fn new(limit: i64, offset: i64) -> Self {
		Self { limit, offset }
	}
}

/// Compact status view of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusView {
	pub order_id: Uuid,
	pub status: OrderStatus,
	pub payment_status: PaymentStatus,
	pub updated_at: DateTime<Utc>,
}

impl From<&Order> for OrderStatusView {
	fn from(order: &Order) -> Self {
		Self {
			order_id: order.id,
			status: order.status,
			payment_status: order.payment_status,
			updated_at: order.updated_at,
		}
	}
}

/// Error returned when a status string is not one of the known values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseStatusError {
	pub kind: &'static str,
	pub value: String,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Order has been placed and awaits confirmation.
	Pending,
	/// Order has been confirmed.
	Confirmed,
	/// Order is being prepared for shipment.
	Processing,
	/// Order has left the warehouse.
	Shipped,
	/// Order has reached the customer. Terminal.
	Delivered,
	/// Order was cancelled before processing. Terminal.
	Cancelled,
}

impl OrderStatus {
	/// Returns the lowercase wire/database representation.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Confirmed => "confirmed",
			OrderStatus::Processing => "processing",
			OrderStatus::Shipped => "shipped",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
		}
	}

	/// Returns an iterator over all variants in lifecycle order.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Pending,
			Self::Confirmed,
			Self::Processing,
			Self::Shipped,
			Self::Delivered,
			Self::Cancelled,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = ParseStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| ParseStatusError {
				kind: "order status",
				value: s.to_string(),
			})
	}
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Pending,
	Completed,
	Failed,
	Refunded,
}

impl PaymentStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			PaymentStatus::Pending => "pending",
			PaymentStatus::Completed => "completed",
			PaymentStatus::Failed => "failed",
			PaymentStatus::Refunded => "refunded",
		}
	}

	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Pending,
			Self::Completed,
			Self::Failed,
			Self::Refunded,
		]
		.into_iter()
	}
}

impl fmt::Display for PaymentStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PaymentStatus {
	type Err = ParseStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::all()
			.find(|status| status.as_str() == s)
			.ok_or_else(|| ParseStatusError {
				kind: "payment status",
				value: s.to_string(),
			})
	}
}
