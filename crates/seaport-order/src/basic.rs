//! Basic-fulfillment classification.
//!
//! `fulfillBasicOrder` is the cheapest settlement path, but it only accepts a
//! narrow shape of order: one NFT traded for a single currency, fixed
//! amounts, and the first consideration item paying the offerer.

use alloy::primitives::{Address, Bytes, B256, U256};
use seaport_types::{abi, ConsiderationItem, Item, ItemType, OfferItem, Order, OrderParameters};

use crate::OrderError;

/// Transfer route encoded in the upper part of a basic order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicOrderRouteType {
	EthToErc721 = 0,
	EthToErc1155 = 1,
	Erc20ToErc721 = 2,
	Erc20ToErc1155 = 3,
	Erc721ToErc20 = 4,
	Erc1155ToErc20 = 5,
}

impl BasicOrderRouteType {
	/// Route for an order offering `offer` and paying the offerer `for_offerer`.
	pub fn for_items(offer: ItemType, for_offerer: ItemType) -> Option<Self> {
		use BasicOrderRouteType::*;
		match (offer, for_offerer) {
			(ItemType::Erc721, ItemType::Native) => Some(EthToErc721),
			(ItemType::Erc1155, ItemType::Native) => Some(EthToErc1155),
			(ItemType::Erc721, ItemType::Erc20) => Some(Erc20ToErc721),
			(ItemType::Erc1155, ItemType::Erc20) => Some(Erc20ToErc1155),
			(ItemType::Erc20, ItemType::Erc721) => Some(Erc721ToErc20),
			(ItemType::Erc20, ItemType::Erc1155) => Some(Erc1155ToErc20),
			_ => None,
		}
	}
}

/// True when every currency item shares one item type and token.
fn currencies_are_uniform(offer: &[OfferItem], consideration: &[ConsiderationItem]) -> bool {
	let mut currencies = offer
		.iter()
		.map(|item| (item.item_type, item.token))
		.chain(consideration.iter().map(|item| (item.item_type, item.token)))
		.filter(|(item_type, _)| item_type.is_currency());

	match currencies.next() {
		Some(first) => currencies.all(|other| other == first),
		None => true,
	}
}

/// Shape check for the basic path.
///
/// Requires exactly one offer item, at least one consideration item, exactly
/// one plain ERC721/ERC1155 item and no criteria items across both sides,
/// uniform currency, and fixed amounts everywhere.
pub fn is_basic_eligible(offer: &[OfferItem], consideration: &[ConsiderationItem]) -> bool {
	if offer.len() != 1 || consideration.is_empty() {
		return false;
	}

	let types = || {
		offer
			.iter()
			.map(Item::item_type)
			.chain(consideration.iter().map(Item::item_type))
	};
	let plain_nfts = types()
		.filter(|t| matches!(t, ItemType::Erc721 | ItemType::Erc1155))
		.count();
	let criteria = types().filter(|t| t.is_criteria()).count();
	if plain_nfts != 1 || criteria != 0 {
		return false;
	}

	if !currencies_are_uniform(offer, consideration) {
		return false;
	}

	offer.iter().all(Item::has_fixed_amount) && consideration.iter().all(Item::has_fixed_amount)
}

/// Refuses a single offered item with nothing asked in return. Only bundles
/// may go without consideration.
pub fn ensure_consideration(
	offer: &[OfferItem],
	consideration: &[ConsiderationItem],
) -> Result<(), OrderError> {
	if offer.len() == 1 && consideration.is_empty() {
		return Err(OrderError::Validation(
			"an order offering a single item must ask for consideration".into(),
		));
	}
	Ok(())
}

/// Full precondition set of `fulfillBasicOrder` for an order.
///
/// On top of [`is_basic_eligible`]: the order has never been partially
/// filled, does not offer native currency, has a basic route, is not a
/// legacy proxy order, pays its first consideration item to the offerer,
/// offers enough to cover additional recipients of the offered type, uses
/// the zero address for native currency, zero identifiers for currencies and
/// single-unit ERC721 amounts.
///
/// Tips must already be appended to `parameters.consideration`.
pub fn should_use_basic_fulfill(parameters: &OrderParameters, total_filled: U256) -> bool {
	let offer = &parameters.offer;
	let consideration = &parameters.consideration;
	if !total_filled.is_zero() || parameters.order_type.is_via_proxy() {
		return false;
	}
	if !is_basic_eligible(offer, consideration) {
		return false;
	}

	let offer_item = &offer[0];
	let first = &consideration[0];
	if offer_item.item_type.is_native() {
		return false;
	}
	if BasicOrderRouteType::for_items(offer_item.item_type, first.item_type).is_none() {
		return false;
	}
	if first.recipient != parameters.offerer {
		return false;
	}

	let rest = &consideration[1..];
	if !rest.is_empty() && rest.iter().all(|item| item.item_type == offer_item.item_type) {
		let total = rest
			.iter()
			.fold(U256::ZERO, |acc, item| acc.saturating_add(item.end_amount));
		if total > offer_item.end_amount {
			return false;
		}
	}

	let all = || {
		offer
			.iter()
			.map(|i| (i.item_type, i.token, i.identifier_or_criteria, i.end_amount))
			.chain(
				consideration
					.iter()
					.map(|i| (i.item_type, i.token, i.identifier_or_criteria, i.end_amount)),
			)
	};
	let native_zero_address = all()
		.filter(|(t, ..)| t.is_native())
		.all(|(_, token, ..)| token == Address::ZERO);
	let currency_ids_zero = all()
		.filter(|(t, ..)| t.is_currency())
		.all(|(_, _, id, _)| id.is_zero());
	let erc721_single = all()
		.filter(|(t, ..)| *t == ItemType::Erc721)
		.all(|(.., amount)| amount == U256::from(1));

	native_zero_address && currency_ids_zero && erc721_single
}

/// Encodes `order` (plus `tips`) as `fulfillBasicOrder` parameters.
///
/// The order must have passed [`should_use_basic_fulfill`] with the tips
/// appended to its consideration.
pub fn basic_order_parameters(
	order: &Order,
	tips: &[ConsiderationItem],
	fulfiller_conduit_key: B256,
) -> Result<abi::BasicOrderParameters, OrderError> {
	let params = &order.parameters;
	let (offer_item, for_offerer) = match (params.offer.first(), params.consideration.first()) {
		(Some(offer), Some(first)) => (offer, first),
		_ => {
			return Err(OrderError::Validation(
				"basic fulfillment needs one offer and one consideration item".into(),
			))
		}
	};

	let route = BasicOrderRouteType::for_items(offer_item.item_type, for_offerer.item_type)
		.ok_or_else(|| {
			OrderError::Validation(format!(
				"no basic route from {} to {}",
				offer_item.item_type, for_offerer.item_type
			))
		})?;
	if params.order_type.is_via_proxy() {
		return Err(OrderError::Validation(
			"proxy orders cannot use basic fulfillment".into(),
		));
	}

	let additional_recipients = params.consideration[1..]
		.iter()
		.chain(tips)
		.map(|item| abi::AdditionalRecipient {
			amount: item.start_amount,
			recipient: item.recipient,
		})
		.collect();

	Ok(abi::BasicOrderParameters {
		considerationToken: for_offerer.token,
		considerationIdentifier: for_offerer.identifier_or_criteria,
		considerationAmount: for_offerer.end_amount,
		offerer: params.offerer,
		zone: params.zone,
		offerToken: offer_item.token,
		offerIdentifier: offer_item.identifier_or_criteria,
		offerAmount: offer_item.end_amount,
		basicOrderType: u8::from(params.order_type) + 4 * route as u8,
		startTime: params.start_time,
		endTime: params.end_time,
		zoneHash: params.zone_hash,
		salt: params.salt,
		offererConduitKey: params.conduit_key,
		fulfillerConduitKey: fulfiller_conduit_key,
		totalOriginalAdditionalRecipients: U256::from(params.consideration.len().saturating_sub(1)),
		additionalRecipients: additional_recipients,
		signature: Bytes::clone(&order.signature),
	})
}

/// Native value attached to a basic fulfillment: consideration items (and
/// tips) of a different type than the offer that are paid in native currency.
pub fn basic_native_value(order: &Order, tips: &[ConsiderationItem]) -> U256 {
	let offer_type = order.parameters.offer.first().map(|item| item.item_type);
	order
		.parameters
		.consideration
		.iter()
		.chain(tips)
		.filter(|item| Some(item.item_type) != offer_type && item.item_type.is_native())
		.fold(U256::ZERO, |acc, item| acc.saturating_add(item.end_amount))
}
