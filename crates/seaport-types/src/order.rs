//! Order types.
//!
//! `OrderComponents` is what the offerer signs (it carries the counter),
//! `OrderParameters` is what the settlement contract receives (it carries the
//! original consideration length instead). `OrderStatus` mirrors the
//! contract's mutable per-order record.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::{ConsiderationItem, OfferItem};

/// Order type, encoded on-chain as a `uint8`.
///
/// The `*ViaProxy` variants route the offerer's transfers through a legacy
/// per-account proxy and are retained for compatibility with early
/// deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum OrderType {
	FullOpen = 0,
	PartialOpen = 1,
	FullRestricted = 2,
	PartialRestricted = 3,
	FullOpenViaProxy = 4,
	PartialOpenViaProxy = 5,
	FullRestrictedViaProxy = 6,
	PartialRestrictedViaProxy = 7,
}

impl OrderType {
	/// Builds the order type from its three independent flags.
	pub fn from_flags(allow_partial_fills: bool, restricted_by_zone: bool, via_proxy: bool) -> Self {
		let base = u8::from(allow_partial_fills) + 2 * u8::from(restricted_by_zone);
		let value = if via_proxy { base + 4 } else { base };
		// every combination of the three flags is a valid discriminant
		OrderType::try_from(value).unwrap_or(OrderType::FullOpen)
	}

	pub fn allows_partial_fills(self) -> bool {
		(self as u8) % 2 == 1
	}

	pub fn is_restricted(self) -> bool {
		matches!((self as u8) % 4, 2 | 3)
	}

	pub fn is_via_proxy(self) -> bool {
		(self as u8) >= 4
	}

	/// Same order type with transfers routed through the settlement operator.
	pub fn without_proxy(self) -> Self {
		Self::from_flags(self.allows_partial_fills(), self.is_restricted(), false)
	}

	/// Same order type with transfers routed through the legacy proxy.
	pub fn with_proxy(self) -> Self {
		Self::from_flags(self.allows_partial_fills(), self.is_restricted(), true)
	}
}

impl From<OrderType> for u8 {
	fn from(order_type: OrderType) -> Self {
		order_type as u8
	}
}

impl TryFrom<u8> for OrderType {
	type Error = String;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(OrderType::FullOpen),
			1 => Ok(OrderType::PartialOpen),
			2 => Ok(OrderType::FullRestricted),
			3 => Ok(OrderType::PartialRestricted),
			4 => Ok(OrderType::FullOpenViaProxy),
			5 => Ok(OrderType::PartialOpenViaProxy),
			6 => Ok(OrderType::FullRestrictedViaProxy),
			7 => Ok(OrderType::PartialRestrictedViaProxy),
			other => Err(format!("Unknown order type: {}", other)),
		}
	}
}

/// Order parameters as submitted to the settlement contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderParameters {
	pub offerer: Address,
	pub zone: Address,
	pub offer: Vec<OfferItem>,
	pub consideration: Vec<ConsiderationItem>,
	pub order_type: OrderType,
	pub start_time: U256,
	pub end_time: U256,
	pub zone_hash: B256,
	pub salt: U256,
	pub conduit_key: B256,
	pub total_original_consideration_items: U256,
}

/// Order parameters as signed by the offerer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderComponents {
	pub offerer: Address,
	pub zone: Address,
	pub offer: Vec<OfferItem>,
	pub consideration: Vec<ConsiderationItem>,
	pub order_type: OrderType,
	pub start_time: U256,
	pub end_time: U256,
	pub zone_hash: B256,
	pub salt: U256,
	pub conduit_key: B256,
	pub counter: U256,
}

impl OrderComponents {
	/// Drops the counter; the current consideration length becomes the original length.
	pub fn to_parameters(&self) -> OrderParameters {
		OrderParameters {
			offerer: self.offerer,
			zone: self.zone,
			offer: self.offer.clone(),
			consideration: self.consideration.clone(),
			order_type: self.order_type,
			start_time: self.start_time,
			end_time: self.end_time,
			zone_hash: self.zone_hash,
			salt: self.salt,
			conduit_key: self.conduit_key,
			total_original_consideration_items: U256::from(self.consideration.len()),
		}
	}
}

impl OrderParameters {
	/// Attaches the offerer's counter, truncating consideration to the signed length.
	pub fn to_components(&self, counter: U256) -> OrderComponents {
		let original = self
			.total_original_consideration_items
			.try_into()
			.unwrap_or(usize::MAX)
			.min(self.consideration.len());
		OrderComponents {
			offerer: self.offerer,
			zone: self.zone,
			offer: self.offer.clone(),
			consideration: self.consideration[..original].to_vec(),
			order_type: self.order_type,
			start_time: self.start_time,
			end_time: self.end_time,
			zone_hash: self.zone_hash,
			salt: self.salt,
			conduit_key: self.conduit_key,
			counter,
		}
	}
}

/// A signed order ready to be fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	pub parameters: OrderParameters,
	pub signature: Bytes,
}

impl Order {
	/// True when a signature is attached. Unsigned orders are only valid
	/// once validated on-chain.
	pub fn has_signature(&self) -> bool {
		!self.signature.is_empty()
	}
}

/// A signed order together with the counter it was signed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithCounter {
	pub parameters: OrderComponents,
	pub signature: Bytes,
}

impl From<OrderWithCounter> for Order {
	fn from(order: OrderWithCounter) -> Self {
		Order {
			parameters: order.parameters.to_parameters(),
			signature: order.signature,
		}
	}
}

/// On-chain status record of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
	pub is_validated: bool,
	pub is_cancelled: bool,
	pub total_filled: U256,
	pub total_size: U256,
}

impl OrderStatus {
	pub fn is_fully_filled(&self) -> bool {
		!self.total_size.is_zero() && self.total_filled == self.total_size
	}

	pub fn is_partially_filled(&self) -> bool {
		!self.total_filled.is_zero() && self.total_filled < self.total_size
	}
}

/// Side of an order an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
	Offer = 0,
	Consideration = 1,
}

/// Identifier and merkle proof supplied for a criteria item at fulfillment time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCriteria {
	pub identifier: U256,
	pub proof: Vec<B256>,
}

/// Resolution of one criteria item, passed to the settlement contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaResolver {
	pub order_index: usize,
	pub side: Side,
	pub index: usize,
	pub identifier: U256,
	pub criteria_proof: Vec<B256>,
}

/// Order with a fill fraction and extra zone data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedOrder {
	pub parameters: OrderParameters,
	pub numerator: U256,
	pub denominator: U256,
	pub signature: Bytes,
	pub extra_data: Bytes,
}

impl AdvancedOrder {
	/// Wraps an order for a complete fill.
	pub fn full(order: &Order) -> Self {
		Self::fraction(order, U256::from(1), U256::from(1))
	}

	/// Wraps an order for a `numerator / denominator` fill.
	pub fn fraction(order: &Order, numerator: U256, denominator: U256) -> Self {
		AdvancedOrder {
			parameters: order.parameters.clone(),
			numerator,
			denominator,
			signature: order.signature.clone(),
			extra_data: Bytes::new(),
		}
	}
}
