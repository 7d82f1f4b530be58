//! Validation of incoming order requests.

use crate::OrderError;
use order_types::{CreateOrderRequest, NewOrder, NewOrderItem};
use rust_decimal::Decimal;

/// Decimal places kept for prices and totals.
pub const MONEY_SCALE: u32 = 2;

/// Largest total a `NUMERIC(12, 2)` column holds.
pub const MAX_ORDER_TOTAL: Decimal =
	Decimal::from_parts(0xd4a5_0fff, 0xe8, 0, false, MONEY_SCALE);

/// Checks a create request and turns it into a [`NewOrder`] with its total.
///
/// Rejects empty user ids and shipping addresses, orders without items, and
/// items with an empty product id, a quantity below one, a non-positive
/// price or a price with fractions of a cent. Totals above
/// [`MAX_ORDER_TOTAL`] are rejected as well.
pub fn validate_create_request(request: CreateOrderRequest) -> Result<NewOrder, OrderError> {
	if request.user_id.trim().is_empty() {
		return Err(OrderError::Validation("user_id is required".into()));
	}
	if request.shipping_address.trim().is_empty() {
		return Err(OrderError::Validation(
			"shipping_address is required".into(),
		));
	}
	if request.items.is_empty() {
		return Err(OrderError::Validation(
			"order must contain at least one item".into(),
		));
	}

	for (index, item) in request.items.iter().enumerate() {
		validate_item(index, item)?;
	}

	let total_amount = order_total(&request.items)?;
	if total_amount > MAX_ORDER_TOTAL {
		return Err(OrderError::Validation(format!(
			"order total must not exceed {}",
			MAX_ORDER_TOTAL
		)));
	}

	Ok(NewOrder {
		user_id: request.user_id,
		shipping_address: request.shipping_address,
		total_amount,
		items: request.items,
	})
}

fn validate_item(index: usize, item: &NewOrderItem) -> Result<(), OrderError> {
	if item.product_id.trim().is_empty() {
		return Err(OrderError::Validation(format!(
			"items[{}].product_id is required",
			index
		)));
	}
	if item.quantity < 1 {
		return Err(OrderError::Validation(format!(
			"items[{}].quantity must be at least 1",
			index
		)));
	}
	if item.price <= Decimal::ZERO {
		return Err(OrderError::Validation(format!(
			"items[{}].price must be greater than 0",
			index
		)));
	}
	if item.price.normalize().scale() > MONEY_SCALE {
		return Err(OrderError::Validation(format!(
			"items[{}].price must have at most {} decimal places",
			index, MONEY_SCALE
		)));
	}
	Ok(())
}

/// Sums the line totals of all items.
pub fn order_total(items: &[NewOrderItem]) -> Result<Decimal, OrderError> {
	items.iter().try_fold(Decimal::ZERO, |total, item| {
		item.line_total()
			.and_then(|line| total.checked_add(line))
			.ok_or_else(|| OrderError::Validation("order total overflows".into()))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(product_id: &str, quantity: i32, price: &str) -> NewOrderItem {
		NewOrderItem {
			product_id: product_id.into(),
			quantity,
			price: price.parse().unwrap(),
		}
	}

	fn request(items: Vec<NewOrderItem>) -> CreateOrderRequest {
		CreateOrderRequest {
			user_id: "user-1".into(),
			shipping_address: "1 Main St".into(),
			items,
		}
	}

	#[test]
	fn test_total_is_exact() {
		let new_order = validate_create_request(request(vec![
			item("a", 2, "10.00"),
			item("b", 1, "5.00"),
		]))
		.unwrap();
		assert_eq!(new_order.total_amount, "25.00".parse::<Decimal>().unwrap());
		assert_eq!(new_order.items.len(), 2);

		// No binary floating point drift
		let total = order_total(&[item("a", 3, "0.10"), item("b", 1, "0.20")]).unwrap();
		assert_eq!(total, "0.50".parse::<Decimal>().unwrap());
	}

	#[test]
	fn test_rejects_empty_items() {
		let err = validate_create_request(request(vec![])).unwrap_err();
		assert!(matches!(err, OrderError::Validation(msg) if msg.contains("at least one item")));
	}

	#[test]
	fn test_rejects_bad_items() {
		for bad in [
			item("", 1, "1.00"),
			item("a", 0, "1.00"),
			item("a", -3, "1.00"),
			item("a", 1, "0"),
			item("a", 1, "-2.50"),
		] {
			let result = validate_create_request(request(vec![item("ok", 1, "1.00"), bad]));
			assert!(
				matches!(result, Err(OrderError::Validation(ref msg)) if msg.starts_with("items[1]")),
				"{result:?}"
			);
		}
	}

	#[test]
	fn test_rejects_sub_cent_prices() {
		for price in ["0.001", "19.999", "0.0000000000000000000000000001"] {
			let result = validate_create_request(request(vec![item("a", 3, price)]));
			assert!(
				matches!(result, Err(OrderError::Validation(ref msg)) if msg.contains("decimal places")),
				"{price}: {result:?}"
			);
		}

		// Trailing zeros are not extra precision
		let new_order = validate_create_request(request(vec![item("a", 3, "1.5000")])).unwrap();
		assert_eq!(new_order.total_amount, "4.50".parse::<Decimal>().unwrap());
	}

	#[test]
	fn test_total_matches_sum_of_lines() {
		let items = vec![item("a", 7, "0.01"), item("b", 3, "33.33"), item("c", 1, "0.99")];
		let new_order = validate_create_request(request(items.clone())).unwrap();
		let lines: Decimal = items.iter().filter_map(NewOrderItem::line_total).sum();
		assert_eq!(new_order.total_amount, lines);
		assert_eq!(new_order.total_amount, "101.05".parse::<Decimal>().unwrap());
	}

	#[test]
	fn test_rejects_total_above_column_range() {
		let at_limit = validate_create_request(request(vec![item("a", 1, "9999999999.99")])).unwrap();
		assert_eq!(at_limit.total_amount, MAX_ORDER_TOTAL);

		let result = validate_create_request(request(vec![
			item("a", 1, "9999999999.99"),
			item("b", 1, "0.01"),
		]));
		assert!(matches!(result, Err(OrderError::Validation(ref msg)) if msg.contains("must not exceed")));

		let result = validate_create_request(request(vec![item("a", i32::MAX, "9999999999.99")]));
		assert!(matches!(result, Err(OrderError::Validation(_))));
	}

	#[test]
	fn test_rejects_missing_user_and_address() {
		let mut req = request(vec![item("a", 1, "1.00")]);
		req.user_id = " ".into();
		assert!(validate_create_request(req).is_err());

		let mut req = request(vec![item("a", 1, "1.00")]);
		req.shipping_address = String::new();
		assert!(validate_create_request(req).is_err());
	}
}
