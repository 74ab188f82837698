//! Multi-order aggregation.
//!
//! Both entry points flatten every item of every order, tagged with its
//! (order index, item index), and group them under a key in first-seen
//! order. Groups only hold back-references, never item copies, so the output
//! is purely structural and identical across runs on identical input.

use alloy::primitives::{Address, Bytes, B256, U256};
use seaport_types::{
	AvailableFulfillments, Fulfillment, FulfillmentComponent, InputCriteria, Item, ItemType,
	OfferItem, Order, OrderParameters, Side,
};
use std::collections::HashMap;
use std::hash::Hash;

use crate::{OrderCriteria, OrderError};

/// Insertion-ordered map.
struct OrderedMap<K, V> {
	index: HashMap<K, usize>,
	entries: Vec<V>,
}

impl<K: Hash + Eq, V: Default> OrderedMap<K, V> {
	fn new() -> Self {
		Self {
			index: HashMap::new(),
			entries: Vec::new(),
		}
	}

	fn entry(&mut self, key: K) -> &mut V {
		let position = *self.index.entry(key).or_insert_with(|| {
			self.entries.push(V::default());
			self.entries.len() - 1
		});
		&mut self.entries[position]
	}

	fn into_values(self) -> std::vec::IntoIter<V> {
		self.entries.into_iter()
	}
}

/// Category, token and concrete identifier an item transfers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TransferKey {
	item_type: ItemType,
	token: Address,
	identifier: U256,
}

fn supplied_criteria<'a, I: Item>(
	criteria: Option<&'a OrderCriteria>,
	side: Side,
	items: &[I],
	index: usize,
) -> Option<&'a InputCriteria> {
	criteria.and_then(|c| c.for_item(side, items, index))
}

/// Key of an item; criteria items use the supplied identifier. Proofs are
/// checked when criteria resolvers are generated, not here.
fn transfer_key<I: Item>(
	order_index: usize,
	side: Side,
	items: &[I],
	index: usize,
	criteria: Option<&OrderCriteria>,
) -> Result<TransferKey, OrderError> {
	let item = &items[index];
	let identifier = if item.item_type().is_criteria() {
		supplied_criteria(criteria, side, items, index)
			.map(|input| input.identifier)
			.ok_or_else(|| {
				OrderError::Validation(format!(
					"criteria item {} on the {:?} side of order {} has no identifier",
					index, side, order_index
				))
			})?
	} else {
		item.identifier_or_criteria()
	};

	Ok(TransferKey {
		item_type: item.item_type().resolved(),
		token: item.token(),
		identifier,
	})
}

#[derive(Default)]
struct Bucket {
	offer: Vec<FulfillmentComponent>,
	consideration: Vec<(Address, Vec<FulfillmentComponent>)>,
}

impl Bucket {
	fn add_consideration(&mut self, recipient: Address, component: FulfillmentComponent) {
		match self.consideration.iter_mut().find(|(r, _)| *r == recipient) {
			Some((_, members)) => members.push(component),
			None => self.consideration.push((recipient, vec![component])),
		}
	}
}

/// Fulfillments for matching `orders` against each other.
///
/// Items are bucketed by (category, token, identifier) in first-seen order,
/// each order contributing its offer items before its consideration items.
/// Every bucket emits one fulfillment per consideration recipient, carrying
/// the bucket's whole offer side. A consideration item whose bucket has no
/// offer member cannot be paid and fails the whole match.
pub fn match_fulfillments(
	orders: &[&OrderParameters],
	criteria: &[OrderCriteria],
) -> Result<Vec<Fulfillment>, OrderError> {
	let mut buckets: OrderedMap<TransferKey, Bucket> = OrderedMap::new();

	for (order_index, order) in orders.iter().enumerate() {
		let order_criteria = criteria.get(order_index);

		for item_index in 0..order.offer.len() {
			let key = transfer_key(order_index, Side::Offer, &order.offer, item_index, order_criteria)?;
			buckets
				.entry(key)
				.offer
				.push(FulfillmentComponent::new(order_index, item_index));
		}

		for (item_index, item) in order.consideration.iter().enumerate() {
			let key = transfer_key(
				order_index,
				Side::Consideration,
				&order.consideration,
				item_index,
				order_criteria,
			)?;
			buckets.entry(key).add_consideration(
				item.recipient,
				FulfillmentComponent::new(order_index, item_index),
			);
		}
	}

	let mut fulfillments = Vec::new();
	for bucket in buckets.into_values() {
		for (_, members) in bucket.consideration {
			if bucket.offer.is_empty() {
				let first = members[0];
				return Err(OrderError::UnmatchedConsiderationItem {
					order_index: first.order_index,
					item_index: first.item_index,
				});
			}
			fulfillments.push(Fulfillment {
				offer_components: bucket.offer.clone(),
				consideration_components: members,
			});
		}
	}

	tracing::debug!(
		orders = orders.len(),
		fulfillments = fulfillments.len(),
		"Matched orders"
	);
	Ok(fulfillments)
}

/// Aggregation key for `fulfillAvailableAdvancedOrders`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AggregateKey {
	party: Address,
	conduit_key: Option<B256>,
	transfer: TransferKey,
	/// ERC721 items are unique and never aggregate.
	unique: Option<(usize, usize)>,
}

/// Offer and consideration groups for fulfilling `orders` independently in
/// one call.
///
/// Offer items aggregate when they share offerer, conduit, token and
/// identifier; consideration items when they share recipient, token and
/// identifier.
pub fn fulfill_available_fulfillments(
	orders: &[&OrderParameters],
	criteria: &[OrderCriteria],
) -> Result<AvailableFulfillments, OrderError> {
	let mut offer: OrderedMap<AggregateKey, Vec<FulfillmentComponent>> = OrderedMap::new();
	let mut consideration: OrderedMap<AggregateKey, Vec<FulfillmentComponent>> = OrderedMap::new();

	for (order_index, order) in orders.iter().enumerate() {
		let order_criteria = criteria.get(order_index);

		for (item_index, item) in order.offer.iter().enumerate() {
			let transfer = transfer_key(order_index, Side::Offer, &order.offer, item_index, order_criteria)?;
			let key = AggregateKey {
				party: order.offerer,
				conduit_key: Some(order.conduit_key),
				transfer,
				unique: item.item_type.is_erc721().then_some((order_index, item_index)),
			};
			offer
				.entry(key)
				.push(FulfillmentComponent::new(order_index, item_index));
		}

		for (item_index, item) in order.consideration.iter().enumerate() {
			let transfer = transfer_key(
				order_index,
				Side::Consideration,
				&order.consideration,
				item_index,
				order_criteria,
			)?;
			let key = AggregateKey {
				party: item.recipient,
				conduit_key: None,
				transfer,
				unique: item.item_type.is_erc721().then_some((order_index, item_index)),
			};
			consideration
				.entry(key)
				.push(FulfillmentComponent::new(order_index, item_index));
		}
	}

	Ok(AvailableFulfillments {
		offer_fulfillments: offer.into_values().collect(),
		consideration_fulfillments: consideration.into_values().collect(),
	})
}

/// Counter order that lets `recipient` take a private listing through
/// `matchOrders`.
///
/// The counter order offers the summed payment for every consideration
/// item not addressed to `recipient`; its consideration is empty because the
/// listing itself already routes the goods to `recipient`.
pub fn private_listing_counter_order(order: &Order, recipient: Address) -> Result<Order, OrderError> {
	let payments: Vec<_> = order
		.parameters
		.consideration
		.iter()
		.filter(|item| item.recipient != recipient)
		.collect();

	let first = payments.first().ok_or_else(|| {
		OrderError::Validation("the private listing has no payment items".into())
	})?;
	if !payments.iter().all(|item| item.item_type.is_currency()) {
		return Err(OrderError::Validation(
			"the consideration for the private listing did not contain only currency items".into(),
		));
	}
	if !payments
		.iter()
		.all(|item| item.item_type == first.item_type && item.token == first.token)
	{
		return Err(OrderError::Validation(
			"not all currency items were the same for the private listing".into(),
		));
	}

	let (start_amount, end_amount) = payments.iter().fold((U256::ZERO, U256::ZERO), |acc, item| {
		(
			acc.0.saturating_add(item.start_amount),
			acc.1.saturating_add(item.end_amount),
		)
	});

	Ok(Order {
		parameters: OrderParameters {
			offerer: recipient,
			offer: vec![OfferItem {
				item_type: first.item_type,
				token: first.token,
				identifier_or_criteria: first.identifier_or_criteria,
				start_amount,
				end_amount,
			}],
			consideration: vec![],
			total_original_consideration_items: U256::ZERO,
			..order.parameters.clone()
		},
		signature: Bytes::new(),
	})
}

/// Every order must be signed unless the contract already validated it.
pub fn ensure_signatures(orders: &[&Order], validated: &[bool]) -> Result<(), OrderError> {
	for (order_index, order) in orders.iter().enumerate() {
		let is_validated = validated.get(order_index).copied().unwrap_or(false);
		if !order.has_signature() && !is_validated {
			return Err(OrderError::MissingSignature { order_index });
		}
	}
	Ok(())
}
