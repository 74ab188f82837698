//! Marketplace fees expressed in basis points.

use alloy::primitives::{Address, U256, U512};
use seaport_types::{ConsiderationItem, ItemType, ONE_HUNDRED_PERCENT_BP};
use serde::{Deserialize, Serialize};

use crate::OrderError;

/// Fee paid to `recipient` as a share of the order's currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
	pub recipient: Address,
	pub basis_points: u16,
}

/// `amount * basis_points / 10_000`, rounded down.
pub fn multiply_basis_points(amount: U256, basis_points: u64) -> U256 {
	let scaled = U512::from(amount) * U512::from(basis_points) / U512::from(ONE_HUNDRED_PERCENT_BP);
	U256::saturating_from(scaled)
}

fn total_basis_points(fees: &[Fee]) -> Result<u64, OrderError> {
	let total: u64 = fees.iter().map(|fee| u64::from(fee.basis_points)).sum();
	if total > ONE_HUNDRED_PERCENT_BP {
		return Err(OrderError::Validation(format!(
			"fees total {} basis points, more than the full amount",
			total
		)));
	}
	Ok(total)
}

/// Reduces every currency item by the combined fee share so the fee items
/// can be paid out of the same total.
pub fn deduct_fees(
	items: &[ConsiderationItem],
	fees: &[Fee],
) -> Result<Vec<ConsiderationItem>, OrderError> {
	let total = total_basis_points(fees)?;
	Ok(items
		.iter()
		.map(|item| {
			if !item.item_type.is_currency() {
				return item.clone();
			}
			ConsiderationItem {
				start_amount: item.start_amount - multiply_basis_points(item.start_amount, total),
				end_amount: item.end_amount - multiply_basis_points(item.end_amount, total),
				..item.clone()
			}
		})
		.collect())
}

/// One consideration item per fee, paid in `token` and computed from the
/// summed currency amounts of the order.
pub fn fee_consideration_items(
	fees: &[Fee],
	token: Address,
	base_start_amount: U256,
	base_end_amount: U256,
) -> Result<Vec<ConsiderationItem>, OrderError> {
	total_basis_points(fees)?;
	let item_type = if token == Address::ZERO {
		ItemType::Native
	} else {
		ItemType::Erc20
	};

	Ok(fees
		.iter()
		.map(|fee| ConsiderationItem {
			item_type,
			token,
			identifier_or_criteria: U256::ZERO,
			start_amount: multiply_basis_points(base_start_amount, u64::from(fee.basis_points)),
			end_amount: multiply_basis_points(base_end_amount, u64::from(fee.basis_points)),
			recipient: fee.recipient,
		})
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn eth(amount: u64) -> ConsiderationItem {
		ConsiderationItem {
			item_type: ItemType::Native,
			token: Address::ZERO,
			identifier_or_criteria: U256::ZERO,
			start_amount: U256::from(amount),
			end_amount: U256::from(amount),
			recipient: Address::repeat_byte(1),
		}
	}

	#[test]
	fn test_fees_split_the_original_total() {
		let fees = [
			Fee {
				recipient: Address::repeat_byte(0xfe),
				basis_points: 250,
			},
			Fee {
				recipient: Address::repeat_byte(0xfd),
				basis_points: 500,
			},
		];
		let consideration = vec![eth(10_000)];
		let deducted = deduct_fees(&consideration, &fees).unwrap();
		assert_eq!(deducted[0].start_amount, U256::from(9_250));

		let items =
			fee_consideration_items(&fees, Address::ZERO, U256::from(10_000), U256::from(10_000))
				.unwrap();
		assert_eq!(items[0].start_amount, U256::from(250));
		assert_eq!(items[1].end_amount, U256::from(500));
		assert_eq!(items[1].recipient, Address::repeat_byte(0xfd));
		assert_eq!(items[0].item_type, ItemType::Native);
	}

	#[test]
	fn test_rejects_fees_over_one_hundred_percent() {
		let fees = [Fee {
			recipient: Address::ZERO,
			basis_points: 10_001,
		}];
		assert!(deduct_fees(&[eth(1)], &fees).is_err());
	}

	#[test]
	fn test_nft_items_are_not_deducted() {
		let nft = ConsiderationItem {
			item_type: ItemType::Erc721,
			token: Address::repeat_byte(7),
			identifier_or_criteria: U256::from(3),
			..eth(1)
		};
		let fees = [Fee {
			recipient: Address::ZERO,
			basis_points: 5_000,
		}];
		assert_eq!(deduct_fees(&[nft.clone()], &fees).unwrap(), vec![nft]);
	}
}
