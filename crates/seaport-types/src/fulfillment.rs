//! Aggregation directives for multi-order settlement.

use serde::{Deserialize, Serialize};

/// Pointer to one item of one order within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentComponent {
	pub order_index: usize,
	pub item_index: usize,
}

impl FulfillmentComponent {
	pub fn new(order_index: usize, item_index: usize) -> Self {
		Self {
			order_index,
			item_index,
		}
	}
}

/// One aggregated transfer: the listed offer items pay the listed
/// consideration items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulfillment {
	pub offer_components: Vec<FulfillmentComponent>,
	pub consideration_components: Vec<FulfillmentComponent>,
}

/// Offer and consideration component groups for `fulfillAvailableAdvancedOrders`,
/// where both sides are aggregated independently.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableFulfillments {
	pub offer_fulfillments: Vec<Vec<FulfillmentComponent>>,
	pub consideration_fulfillments: Vec<Vec<FulfillmentComponent>>,
}
