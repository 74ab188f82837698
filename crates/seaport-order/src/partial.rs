//! Partial fills: order size, fill fractions and scaled item amounts.
//!
//! An order's size is the greatest common divisor of all its item amounts;
//! filling `units` of it means filling the fraction `units / size`.

use alloy::primitives::{U256, U512};
use seaport_types::{OrderParameters, OrderStatus};

use crate::OrderError;

fn gcd(mut a: U256, mut b: U256) -> U256 {
	while !b.is_zero() {
		let r = a % b;
		a = b;
		b = r;
	}
	a
}

fn scale(amount: U256, numerator: U256, denominator: U256, round_up: bool) -> U256 {
	if denominator.is_zero() {
		return amount;
	}
	let product = U512::from(amount) * U512::from(numerator);
	let denominator = U512::from(denominator);
	let mut result = product / denominator;
	if round_up && !(product % denominator).is_zero() {
		result += U512::from(1);
	}
	U256::saturating_from(result)
}

/// Item amounts moved when `numerator / denominator` of `order` is filled.
/// Offer amounts round down, consideration amounts round up.
pub fn scale_order_amounts(
	order: &OrderParameters,
	numerator: U256,
	denominator: U256,
) -> OrderParameters {
	let mut scaled = order.clone();
	for item in &mut scaled.offer {
		item.start_amount = scale(item.start_amount, numerator, denominator, false);
		item.end_amount = scale(item.end_amount, numerator, denominator, false);
	}
	for item in &mut scaled.consideration {
		item.start_amount = scale(item.start_amount, numerator, denominator, true);
		item.end_amount = scale(item.end_amount, numerator, denominator, true);
	}
	scaled
}

/// Number of units the order can be split into.
pub fn get_maximum_size_for_order(order: &OrderParameters) -> U256 {
	order
		.offer
		.iter()
		.flat_map(|item| [item.start_amount, item.end_amount])
		.chain(
			order
				.consideration
				.iter()
				.flat_map(|item| [item.start_amount, item.end_amount]),
		)
		.fold(U256::ZERO, gcd)
}

/// Item amounts still available after `total_filled / total_size` was filled.
pub fn map_order_amounts_from_filled_status(
	order: &OrderParameters,
	total_filled: U256,
	total_size: U256,
) -> OrderParameters {
	if total_filled.is_zero() || total_size.is_zero() {
		return order.clone();
	}
	scale_order_amounts(order, total_size.saturating_sub(total_filled), total_size)
}

/// Fill fraction for `units_to_fill`, reduced to lowest terms.
pub fn fill_fraction(order: &OrderParameters, units_to_fill: U256) -> Result<(U256, U256), OrderError> {
	let max_units = get_maximum_size_for_order(order);
	if units_to_fill.is_zero() {
		return Err(OrderError::Validation("units to fill must be greater than zero".into()));
	}
	if units_to_fill > max_units {
		return Err(OrderError::Validation(format!(
			"cannot fill {} units of an order of size {}",
			units_to_fill, max_units
		)));
	}
	let divisor = gcd(units_to_fill, max_units);
	Ok((units_to_fill / divisor, max_units / divisor))
}

/// Fraction of `order` that will actually be filled: `units_to_fill` units
/// (the whole order when absent), capped at what `status` leaves unfilled.
pub fn effective_fill_fraction(
	order: &OrderParameters,
	units_to_fill: Option<U256>,
	status: &OrderStatus,
) -> Result<(U256, U256), OrderError> {
	let (numerator, denominator) = match units_to_fill {
		Some(units) => fill_fraction(order, units)?,
		None => (U256::from(1), U256::from(1)),
	};

	if status.total_size.is_zero() {
		return Ok((numerator, denominator));
	}

	let remaining = status.total_size.saturating_sub(status.total_filled);
	// compare numerator/denominator against remaining/total_size
	let requested = U512::from(numerator) * U512::from(status.total_size);
	let available = U512::from(remaining) * U512::from(denominator);
	if requested > available {
		Ok((remaining, status.total_size))
	} else {
		Ok((numerator, denominator))
	}
}

/// Item amounts for filling `units_to_fill` units, capped at what remains
/// unfilled according to `status`.
pub fn map_order_amounts_from_units_to_fill(
	order: &OrderParameters,
	units_to_fill: U256,
	status: &OrderStatus,
) -> Result<OrderParameters, OrderError> {
	let (numerator, denominator) = effective_fill_fraction(order, Some(units_to_fill), status)?;
	Ok(scale_order_amounts(order, numerator, denominator))
}

/// Refuses orders that can no longer be filled.
pub fn ensure_fillable(status: &OrderStatus) -> Result<(), OrderError> {
	if status.is_cancelled {
		return Err(OrderError::Validation("the order has been cancelled".into()));
	}
	if status.is_fully_filled() {
		return Err(OrderError::Validation("the order has been fully filled".into()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{Address, B256};
	use seaport_types::{ConsiderationItem, ItemType, OfferItem, OrderType};

	fn order() -> OrderParameters {
		OrderParameters {
			offerer: Address::repeat_byte(1),
			zone: Address::ZERO,
			offer: vec![OfferItem {
				item_type: ItemType::Erc1155,
				token: Address::repeat_byte(0x55),
				identifier_or_criteria: U256::from(1),
				start_amount: U256::from(10),
				end_amount: U256::from(10),
			}],
			consideration: vec![ConsiderationItem {
				item_type: ItemType::Native,
				token: Address::ZERO,
				identifier_or_criteria: U256::ZERO,
				start_amount: U256::from(1_000),
				end_amount: U256::from(1_000),
				recipient: Address::repeat_byte(1),
			}],
			order_type: OrderType::PartialOpen,
			start_time: U256::ZERO,
			end_time: U256::MAX,
			zone_hash: B256::ZERO,
			salt: U256::ZERO,
			conduit_key: B256::ZERO,
			total_original_consideration_items: U256::from(1),
		}
	}

	#[test]
	fn test_maximum_size_is_gcd() {
		assert_eq!(get_maximum_size_for_order(&order()), U256::from(10));
	}

	#[test]
	fn test_units_to_fill() {
		let scaled = map_order_amounts_from_units_to_fill(
			&order(),
			U256::from(2),
			&OrderStatus::default(),
		)
		.unwrap();
		assert_eq!(scaled.offer[0].start_amount, U256::from(2));
		assert_eq!(scaled.consideration[0].end_amount, U256::from(200));
		assert_eq!(fill_fraction(&order(), U256::from(4)).unwrap(), (U256::from(2), U256::from(5)));

		assert!(fill_fraction(&order(), U256::ZERO).is_err());
		assert!(fill_fraction(&order(), U256::from(11)).is_err());
	}

	#[test]
	fn test_units_capped_by_remaining() {
		let status = OrderStatus {
			is_validated: true,
			is_cancelled: false,
			total_filled: U256::from(8),
			total_size: U256::from(10),
		};
		let scaled = map_order_amounts_from_units_to_fill(&order(), U256::from(5), &status).unwrap();
		assert_eq!(scaled.offer[0].start_amount, U256::from(2));

		let remaining = map_order_amounts_from_filled_status(&order(), U256::from(8), U256::from(10));
		assert_eq!(remaining.consideration[0].start_amount, U256::from(200));
	}

	#[test]
	fn test_effective_fraction_without_units() {
		let status = OrderStatus {
			is_validated: true,
			is_cancelled: false,
			total_filled: U256::from(3),
			total_size: U256::from(10),
		};
		assert_eq!(
			effective_fill_fraction(&order(), None, &status).unwrap(),
			(U256::from(7), U256::from(10))
		);
		assert_eq!(
			effective_fill_fraction(&order(), None, &OrderStatus::default()).unwrap(),
			(U256::from(1), U256::from(1))
		);
	}

	#[test]
	fn test_unfillable_orders() {
		let cancelled = OrderStatus {
			is_cancelled: true,
			..Default::default()
		};
		assert!(ensure_fillable(&cancelled).is_err());
		let filled = OrderStatus {
			total_filled: U256::from(3),
			total_size: U256::from(3),
			..Default::default()
		};
		assert!(ensure_fillable(&filled).is_err());
		assert!(ensure_fillable(&OrderStatus::default()).is_ok());
	}
}
