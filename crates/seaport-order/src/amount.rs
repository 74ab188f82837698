//! Time-interpolated item amounts.

use alloy::primitives::{U256, U512};
use seaport_types::{Item, OrderParameters, DEFAULT_ASCENDING_AMOUNT_TIMESTAMP_BUFFER};

/// Timing inputs for interpolating an item's amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBasedItemParams {
	pub current_block_timestamp: u64,
	pub start_time: U256,
	pub end_time: U256,
	pub is_consideration_item: bool,
	/// Seconds added to the timestamp for ascending amounts, so that a
	/// transaction mined a little later still carries enough value.
	pub ascending_amount_timestamp_buffer: u64,
}

impl TimeBasedItemParams {
	/// Timing of `order` at `current_block_timestamp` with the default buffer.
	pub fn for_order(
		order: &OrderParameters,
		current_block_timestamp: u64,
		is_consideration_item: bool,
	) -> Self {
		Self {
			current_block_timestamp,
			start_time: order.start_time,
			end_time: order.end_time,
			is_consideration_item,
			ascending_amount_timestamp_buffer: DEFAULT_ASCENDING_AMOUNT_TIMESTAMP_BUFFER,
		}
	}
}

/// Amount of an item at the given point in time.
///
/// Before `start_time` the start amount applies, at or after `end_time` the
/// end amount. In between the amount is interpolated linearly; consideration
/// items round up and offer items round down. Without timing information the
/// larger of the two amounts is returned, which is what balance checks need.
pub fn current_amount(start: U256, end: U256, params: Option<&TimeBasedItemParams>) -> U256 {
	let Some(params) = params else {
		return start.max(end);
	};
	if start == end {
		return start;
	}
	if params.end_time <= params.start_time {
		return end;
	}

	let is_ascending = end > start;
	let timestamp = U256::from(params.current_block_timestamp);
	let adjusted = if is_ascending {
		timestamp.saturating_add(U256::from(params.ascending_amount_timestamp_buffer))
	} else {
		timestamp
	};

	if adjusted < params.start_time {
		return start;
	}
	if adjusted >= params.end_time {
		return end;
	}

	let duration = params.end_time - params.start_time;
	let elapsed = adjusted - params.start_time;
	let remaining = duration - elapsed;

	let wide = |value: U256| U512::from(value);
	let mut total = wide(start) * wide(remaining) + wide(end) * wide(elapsed);
	if params.is_consideration_item {
		total += wide(duration) - U512::from(1);
	}
	// the interpolated value never exceeds max(start, end)
	U256::saturating_from(total / wide(duration))
}

/// Offer or consideration item amount at `params`, honoring the item's side.
pub fn current_item_amount<I: Item>(item: &I, params: Option<&TimeBasedItemParams>) -> U256 {
	current_amount(item.start_amount(), item.end_amount(), params)
}

/// Sum of native currency owed by the fulfiller across `consideration`.
pub fn native_consideration_total<I: Item>(
	consideration: &[I],
	params: Option<&TimeBasedItemParams>,
) -> U256 {
	consideration
		.iter()
		.filter(|item| item.item_type().is_native())
		.fold(U256::ZERO, |acc, item| {
			acc.saturating_add(current_item_amount(item, params))
		})
}
