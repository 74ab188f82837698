//! Criteria-based items: merkle trees over token identifiers and the
//! resolvers that pin a criteria item to a concrete identifier.
//!
//! Leaves are `keccak256(identifier)` over the identifier's 32-byte
//! big-endian encoding. Leaves are sorted and each parent hashes its two
//! children in ascending order, so a proof is just the list of siblings. A
//! zero root is the wildcard: any identifier in the collection is accepted
//! and no proof is needed.

use alloy::primitives::{keccak256, B256, U256};
use seaport_types::{CriteriaResolver, InputCriteria, Item, OrderParameters, Side};
use serde::{Deserialize, Serialize};

use crate::OrderError;

/// Merkle tree over a set of token identifiers.
#[derive(Debug, Clone)]
pub struct MerkleTree {
	layers: Vec<Vec<B256>>,
}

fn leaf(identifier: U256) -> B256 {
	keccak256(identifier.to_be_bytes::<32>())
}

fn hash_pair(a: B256, b: B256) -> B256 {
	let (low, high) = if a <= b { (a, b) } else { (b, a) };
	let mut buf = [0u8; 64];
	buf[..32].copy_from_slice(low.as_slice());
	buf[32..].copy_from_slice(high.as_slice());
	keccak256(buf)
}

impl MerkleTree {
	pub fn new(identifiers: &[U256]) -> Self {
		let mut leaves: Vec<B256> = identifiers.iter().copied().map(leaf).collect();
		leaves.sort();
		leaves.dedup();

		let mut layers = vec![leaves];
		while let Some(current) = layers.last() {
			if current.len() <= 1 {
				break;
			}
			let next = current
				.chunks(2)
				.map(|pair| match pair {
					[a, b] => hash_pair(*a, *b),
					[single] => *single,
					_ => B256::ZERO,
				})
				.collect();
			layers.push(next);
		}

		Self { layers }
	}

	/// Root of the tree; zero for an empty identifier set.
	pub fn root(&self) -> B256 {
		self.layers
			.last()
			.and_then(|top| top.first())
			.copied()
			.unwrap_or(B256::ZERO)
	}

	/// Root as the `identifierOrCriteria` value of a criteria item.
	pub fn criteria(&self) -> U256 {
		U256::from_be_bytes(self.root().0)
	}

	/// Sibling path for `identifier`, or `None` if it is not in the set.
	pub fn proof(&self, identifier: U256) -> Option<Vec<B256>> {
		let target = leaf(identifier);
		let mut index = self.layers.first()?.binary_search(&target).ok()?;
		let mut proof = Vec::new();

		for layer in &self.layers[..self.layers.len().saturating_sub(1)] {
			let sibling = index ^ 1;
			// an odd last node is promoted without a sibling
			if let Some(hash) = layer.get(sibling) {
				proof.push(*hash);
			}
			index /= 2;
		}

		Some(proof)
	}

	/// Checks `proof` for `identifier` against `root`.
	pub fn verify(root: B256, identifier: U256, proof: &[B256]) -> bool {
		let computed = proof
			.iter()
			.fold(leaf(identifier), |node, sibling| hash_pair(node, *sibling));
		computed == root
	}
}

/// Identifier chosen for a criteria item.
///
/// Non-criteria items keep their own identifier. A criteria item needs a
/// supplied identifier, and a proof unless its root is zero. Whether the
/// proof verifies is left to [`check_proof`].
pub fn resolve_identifier<I: Item>(
	item: &I,
	criteria: Option<&InputCriteria>,
) -> Result<U256, OrderError> {
	if !item.item_type().is_criteria() {
		return Ok(item.identifier_or_criteria());
	}

	let criteria = criteria.ok_or_else(|| {
		OrderError::Validation(format!(
			"criteria item of token {} requires an identifier",
			item.token()
		))
	})?;

	if !item.identifier_or_criteria().is_zero() && criteria.proof.is_empty() {
		return Err(OrderError::Validation(format!(
			"criteria item of token {} requires a proof",
			item.token()
		)));
	}

	Ok(criteria.identifier)
}

/// Verifies the supplied proof of a criteria item against its root. Plain
/// items, missing criteria and the zero root always pass.
pub fn check_proof<I: Item>(item: &I, criteria: Option<&InputCriteria>) -> Result<(), OrderError> {
	let Some(criteria) = criteria else {
		return Ok(());
	};
	if !item.item_type().is_criteria() || item.identifier_or_criteria().is_zero() {
		return Ok(());
	}

	let root = B256::from(item.identifier_or_criteria().to_be_bytes::<32>());
	if !MerkleTree::verify(root, criteria.identifier, &criteria.proof) {
		return Err(OrderError::InvalidProof(criteria.identifier.to_string()));
	}
	Ok(())
}

/// Every criteria proof of `order` that does not verify.
pub fn invalid_proofs(order: &OrderParameters, criteria: &OrderCriteria) -> Vec<OrderError> {
	fn side<I: Item>(side: Side, items: &[I], criteria: &OrderCriteria) -> Vec<OrderError> {
		(0..items.len())
			.filter_map(|index| {
				check_proof(&items[index], criteria.for_item(side, items, index)).err()
			})
			.collect()
	}

	let mut errors = side(Side::Offer, &order.offer, criteria);
	errors.extend(side(Side::Consideration, &order.consideration, criteria));
	errors
}

/// Identifiers supplied for one order's criteria items, in the order the
/// criteria items appear on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCriteria {
	pub offer: Vec<InputCriteria>,
	pub consideration: Vec<InputCriteria>,
}

impl OrderCriteria {
	/// Criteria for the item at `index` on `side`, if it is a criteria item.
	pub fn for_item<I: Item>(&self, side: Side, items: &[I], index: usize) -> Option<&InputCriteria> {
		let item = items.get(index)?;
		if !item.item_type().is_criteria() {
			return None;
		}
		let position = items[..index]
			.iter()
			.filter(|other| other.item_type().is_criteria())
			.count();
		match side {
			Side::Offer => self.offer.get(position),
			Side::Consideration => self.consideration.get(position),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.offer.is_empty() && self.consideration.is_empty()
	}
}

/// Resolved identifier of the item at `index` on `side` of `order`.
pub fn resolved_identifier(
	order: &OrderParameters,
	criteria: Option<&OrderCriteria>,
	side: Side,
	index: usize,
) -> Result<U256, OrderError> {
	match side {
		Side::Offer => {
			let item = &order.offer[index];
			let input = criteria.and_then(|c| c.for_item(side, &order.offer, index));
			resolve_identifier(item, input)
		}
		Side::Consideration => {
			let item = &order.consideration[index];
			let input = criteria.and_then(|c| c.for_item(side, &order.consideration, index));
			resolve_identifier(item, input)
		}
	}
}

fn side_resolvers<I: Item>(
	order_index: usize,
	side: Side,
	items: &[I],
	inputs: &[InputCriteria],
) -> Result<Vec<CriteriaResolver>, OrderError> {
	let criteria_items: Vec<(usize, &I)> = items
		.iter()
		.enumerate()
		.filter(|(_, item)| item.item_type().is_criteria())
		.collect();

	if criteria_items.len() != inputs.len() {
		return Err(OrderError::Validation(format!(
			"order {} has {} criteria items on the {:?} side but {} identifiers were supplied",
			order_index,
			criteria_items.len(),
			side,
			inputs.len()
		)));
	}

	Ok(criteria_items
		.into_iter()
		.zip(inputs)
		.map(|((index, item), input)| {
			let wildcard = item.identifier_or_criteria().is_zero();
			CriteriaResolver {
				order_index,
				side,
				index,
				identifier: input.identifier,
				criteria_proof: if wildcard { Vec::new() } else { input.proof.clone() },
			}
		})
		.collect())
}

/// Criteria resolvers for every criteria item across `orders`.
///
/// `criteria` is indexed like `orders`; orders without criteria items may be
/// given an empty entry or be absent from the tail.
pub fn generate_criteria_resolvers(
	orders: &[&OrderParameters],
	criteria: &[OrderCriteria],
) -> Result<Vec<CriteriaResolver>, OrderError> {
	let empty = OrderCriteria::default();
	let mut offer = Vec::new();
	let mut consideration = Vec::new();

	for (order_index, order) in orders.iter().enumerate() {
		let inputs = criteria.get(order_index).unwrap_or(&empty);
		offer.extend(side_resolvers(order_index, Side::Offer, &order.offer, &inputs.offer)?);
		consideration.extend(side_resolvers(
			order_index,
			Side::Consideration,
			&order.consideration,
			&inputs.consideration,
		)?);
	}

	offer.extend(consideration);
	Ok(offer)
}
