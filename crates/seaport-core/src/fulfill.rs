//! Fulfillment planning.
//!
//! Every operation reads in two passes: offerer counters (and proxies) first,
//! since order hashes depend on them, then order statuses, balance snapshots
//! and the block timestamp in one batch. Planning happens only after the
//! whole batch has resolved.

use crate::actions::{Exchange, OrderUseCase};
use crate::approval::{ApprovalAction, Operators};
use crate::balance::{check_balances, net_requirements, BalanceSnapshot, ItemRequirement};
use crate::{Seaport, SeaportError};
use alloy::primitives::{Address, Bytes, B256, U256};
use futures::future::try_join_all;
use seaport_order::amount::native_consideration_total;
use seaport_order::basic::{basic_native_value, basic_order_parameters};
use seaport_order::criteria::{generate_criteria_resolvers, invalid_proofs, resolved_identifier};
use seaport_order::hash::order_hash;
use seaport_order::matcher::ensure_signatures;
use seaport_order::partial::{effective_fill_fraction, ensure_fillable, scale_order_amounts};
use seaport_order::{
	ensure_consideration, fulfill_available_fulfillments, match_fulfillments,
	private_listing_counter_order, should_use_basic_fulfill, OrderCriteria, OrderError,
	TimeBasedItemParams,
};
use seaport_types::{
	AdvancedOrder, ConsiderationItem, Fulfillment, Order, OrderParameters, OrderStatus, Side,
};

/// An order to fulfil and how to fulfil it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
	pub order: Order,
	/// Units to fill; everything still unfilled when absent.
	pub units_to_fill: Option<U256>,
	/// Identifiers chosen for the order's criteria items.
	pub criteria: OrderCriteria,
	/// Consideration items the fulfiller pays on top of the order. Amounts
	/// refer to a complete fill and shrink with partial fills.
	pub tips: Vec<ConsiderationItem>,
	/// Data forwarded to the zone of restricted orders.
	pub extra_data: Bytes,
}

impl OrderDetails {
	pub fn new(order: Order) -> Self {
		Self {
			order,
			units_to_fill: None,
			criteria: OrderCriteria::default(),
			tips: Vec::new(),
			extra_data: Bytes::new(),
		}
	}
}

impl From<Order> for OrderDetails {
	fn from(order: Order) -> Self {
		Self::new(order)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FulfillOptions {
	/// Conduit the fulfiller's items are transferred through.
	pub conduit_key: B256,
	/// Receiver of the offer items; the fulfiller when absent.
	pub recipient: Option<Address>,
	/// Marketplace domain whose tag is appended to the calldata.
	pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOrdersInput {
	pub orders: Vec<Order>,
	/// Criteria per order, indexed like `orders`.
	pub criteria: Vec<OrderCriteria>,
	/// Fulfillments to use instead of the matcher's.
	pub fulfillments: Option<Vec<Fulfillment>>,
	pub domain: Option<String>,
}

/// One order after its on-chain status is known.
#[derive(Debug, Clone)]
struct PreparedOrder {
	/// Order as submitted, tips appended to its consideration.
	submitted: Order,
	numerator: U256,
	denominator: U256,
	/// Item amounts this fill moves.
	moving: OrderParameters,
	criteria: OrderCriteria,
	extra_data: Bytes,
}

impl PreparedOrder {
	fn is_complete_fill(&self) -> bool {
		self.numerator == self.denominator
	}

	fn advanced(&self) -> AdvancedOrder {
		AdvancedOrder {
			extra_data: self.extra_data.clone(),
			..AdvancedOrder::fraction(&self.submitted, self.numerator, self.denominator)
		}
	}
}

/// `order` with `tips` appended; the original consideration length is kept.
fn with_tips(order: &Order, tips: &[ConsiderationItem]) -> Order {
	let mut submitted = order.clone();
	submitted.parameters.consideration.extend(tips.iter().cloned());
	submitted
}

fn prepare_order(details: &OrderDetails, status: &OrderStatus) -> Result<PreparedOrder, OrderError> {
	ensure_fillable(status)?;

	let parameters = &details.order.parameters;
	let (numerator, denominator) =
		effective_fill_fraction(parameters, details.units_to_fill, status)?;
	if numerator != denominator && !parameters.order_type.allows_partial_fills() {
		return Err(OrderError::Validation(
			"the order does not allow partial fills".into(),
		));
	}

	let submitted = with_tips(&details.order, &details.tips);
	let moving = scale_order_amounts(&submitted.parameters, numerator, denominator);

	Ok(PreparedOrder {
		submitted,
		numerator,
		denominator,
		moving,
		criteria: details.criteria.clone(),
		extra_data: details.extra_data.clone(),
	})
}

/// Requirements for every item on `side` of `order`, criteria resolved.
/// Without `params` the larger of start and end amount is used.
fn side_requirements(
	order: &OrderParameters,
	criteria: &OrderCriteria,
	side: Side,
	params: Option<&TimeBasedItemParams>,
) -> Result<Vec<ItemRequirement>, OrderError> {
	let len = match side {
		Side::Offer => order.offer.len(),
		Side::Consideration => order.consideration.len(),
	};
	(0..len)
		.map(|index| {
			let identifier = Some(resolved_identifier(order, Some(criteria), side, index)?);
			Ok(match side {
				Side::Offer => ItemRequirement::for_item(&order.offer[index], identifier, params),
				Side::Consideration => {
					ItemRequirement::for_item(&order.consideration[index], identifier, params)
				}
			})
		})
		.collect()
}

/// True when `order` sends one of its offered NFTs straight to `fulfiller`.
fn is_private_listing(order: &OrderParameters, fulfiller: Address) -> bool {
	order.consideration.iter().any(|item| {
		item.recipient == fulfiller
			&& item.item_type.is_nft()
			&& order.offer.iter().any(|offered| {
				offered.token == item.token
					&& offered.identifier_or_criteria == item.identifier_or_criteria
			})
	})
}

/// Offerer must hold and have approved everything its order gives up.
fn check_offerer(
	moving: &OrderParameters,
	criteria: &OrderCriteria,
	snapshot: &BalanceSnapshot,
	operator: Option<Address>,
	params: &TimeBasedItemParams,
) -> Result<(), OrderError> {
	let requirements = side_requirements(moving, criteria, Side::Offer, Some(params))?;
	check_balances(&requirements, snapshot)?;

	let Some(operator) = operator else {
		tracing::debug!(
			offerer = %moving.offerer,
			conduit_key = %moving.conduit_key,
			"Offerer operator unknown, skipping approval check"
		);
		return Ok(());
	};
	match requirements
		.iter()
		.find(|requirement| !snapshot.is_approved(requirement, operator))
	{
		Some(missing) => Err(OrderError::Validation(format!(
			"the offerer has not approved {} to transfer token {}",
			operator, missing.token
		))),
		None => Ok(()),
	}
}

impl Seaport {
	/// Operator moving the offerer's items, `None` when it cannot be
	/// determined from the configuration.
	async fn offerer_operator(&self, order: &OrderParameters) -> Result<Option<Address>, SeaportError> {
		if order.order_type.is_via_proxy() {
			return self.proxy_of(order.offerer).await;
		}
		Ok(self.conduit_operator(order.conduit_key).ok())
	}

	/// Operator moving the caller's own offer items in a match.
	async fn own_order_operator(&self, order: &OrderParameters) -> Result<Address, SeaportError> {
		if order.order_type.is_via_proxy() {
			return self.proxy_of(order.offerer).await?.ok_or_else(|| {
				SeaportError::Configuration(format!("{} has no registered proxy", order.offerer))
			});
		}
		self.conduit_operator(order.conduit_key)
	}

	async fn latest_timestamp(&self) -> Result<u64, SeaportError> {
		Ok(self.delivery.latest_block_timestamp().await?)
	}

	/// Plans the fulfillment of one order.
	///
	/// Picks `fulfillBasicOrder` when the order qualifies and no advanced
	/// feature is requested, `fulfillOrder` for other complete fills, and
	/// `fulfillAdvancedOrder` for partial fills, criteria, zone data or a
	/// different recipient. Private listings addressed to the caller are
	/// fulfilled by matching them with a counter order.
	pub async fn fulfill_order(
		&self,
		details: OrderDetails,
		options: FulfillOptions,
	) -> Result<OrderUseCase<Exchange>, SeaportError> {
		let fulfiller = self.account_address().await?;
		let parameters = &details.order.parameters;

		if is_private_listing(parameters, fulfiller) {
			return self.fulfill_private_listing(details, fulfiller, options).await;
		}
		ensure_consideration(&parameters.offer, &parameters.consideration)?;

		let fulfiller_operator = self.conduit_operator(options.conduit_key)?;
		let (counter, offerer_operator) = futures::try_join!(
			self.contract.get_counter(parameters.offerer),
			self.offerer_operator(parameters),
		)?;
		let hash = order_hash(&parameters.to_components(counter));

		let submitted = with_tips(&details.order, &details.tips);
		let paid_keys = side_requirements(
			&submitted.parameters,
			&details.criteria,
			Side::Consideration,
			None,
		)?;
		let offer_keys = side_requirements(&submitted.parameters, &details.criteria, Side::Offer, None)?;
		let fulfiller_operators = [fulfiller_operator];
		let offerer_operators: Vec<Address> = offerer_operator.into_iter().collect();

		let (status, fulfiller_snapshot, offerer_snapshot, now) = futures::try_join!(
			self.contract.get_order_status(hash),
			self.balances
				.snapshot(fulfiller, &paid_keys, &fulfiller_operators),
			self.balances
				.snapshot(parameters.offerer, &offer_keys, &offerer_operators),
			self.latest_timestamp(),
		)?;

		ensure_signatures(&[&details.order], &[status.is_validated])?;
		let prepared = prepare_order(&details, &status)?;

		let consideration_time = self.time_params(&prepared.moving, now, true);
		let offer_time = self.time_params(&prepared.moving, now, false);
		check_offerer(
			&prepared.moving,
			&prepared.criteria,
			&offerer_snapshot,
			offerer_operator,
			&offer_time,
		)?;

		let paid = side_requirements(
			&prepared.moving,
			&prepared.criteria,
			Side::Consideration,
			Some(&consideration_time),
		)?;
		let received = if options.recipient.map_or(true, |r| r == fulfiller) {
			side_requirements(&prepared.moving, &prepared.criteria, Side::Offer, Some(&offer_time))?
		} else {
			Vec::new()
		};
		check_balances(&net_requirements(&paid, &received), &fulfiller_snapshot)?;
		let plan = self
			.planner
			.plan(&paid, &fulfiller_snapshot, &Operators::direct(fulfiller_operator));

		let domain = options.domain.as_deref();
		let plain_request = details.criteria.is_empty()
			&& details.extra_data.is_empty()
			&& options.recipient.is_none();
		let use_basic = plain_request
			&& details.units_to_fill.is_none()
			&& should_use_basic_fulfill(&submitted.parameters, status.total_filled);

		let (method, transaction) = if use_basic {
			let parameters = basic_order_parameters(&details.order, &details.tips, options.conduit_key)?;
			let value = basic_native_value(&details.order, &details.tips);
			(
				"fulfillBasicOrder",
				self.contract
					.fulfill_basic_order_tx(fulfiller, parameters, value, domain),
			)
		} else {
			let value =
				native_consideration_total(&prepared.moving.consideration, Some(&consideration_time));
			if plain_request && prepared.is_complete_fill() {
				(
					"fulfillOrder",
					self.contract.fulfill_order_tx(
						fulfiller,
						&prepared.submitted,
						options.conduit_key,
						value,
						domain,
					),
				)
			} else {
				let resolvers = generate_criteria_resolvers(
					&[&prepared.submitted.parameters],
					std::slice::from_ref(&prepared.criteria),
				)?;
				(
					"fulfillAdvancedOrder",
					self.contract.fulfill_advanced_order_tx(
						fulfiller,
						&prepared.advanced(),
						&resolvers,
						options.conduit_key,
						options.recipient.unwrap_or(Address::ZERO),
						value,
						domain,
					)?,
				)
			}
		};

		tracing::info!(
			order_hash = %hash,
			fulfiller = %fulfiller,
			method,
			numerator = %prepared.numerator,
			denominator = %prepared.denominator,
			value = %transaction.value,
			approvals = plan.approvals.len(),
			"Planned fulfillment"
		);
		let warnings = invalid_proofs(&details.order.parameters, &details.criteria);
		Ok(OrderUseCase::exchange(plan.approvals, transaction).with_warnings(warnings))
	}

	async fn fulfill_private_listing(
		&self,
		details: OrderDetails,
		fulfiller: Address,
		options: FulfillOptions,
	) -> Result<OrderUseCase<Exchange>, SeaportError> {
		if details.units_to_fill.is_some()
			|| !details.tips.is_empty()
			|| options.recipient.is_some_and(|r| r != fulfiller)
		{
			return Err(OrderError::Validation(
				"private listings cannot be partially filled, tipped or redirected".into(),
			)
			.into());
		}

		let counter_order = private_listing_counter_order(&details.order, fulfiller)?;
		tracing::debug!(
			offerer = %details.order.parameters.offerer,
			fulfiller = %fulfiller,
			"Fulfilling private listing through a counter order"
		);

		self.match_orders(MatchOrdersInput {
			orders: vec![details.order, counter_order],
			criteria: vec![details.criteria],
			fulfillments: None,
			domain: options.domain,
		})
		.await
	}

	/// Plans the independent fulfillment of several orders in one
	/// `fulfillAvailableAdvancedOrders` call.
	pub async fn fulfill_orders(
		&self,
		orders: Vec<OrderDetails>,
		options: FulfillOptions,
	) -> Result<OrderUseCase<Exchange>, SeaportError> {
		if orders.is_empty() {
			return Err(OrderError::Validation("no orders to fulfill".into()).into());
		}
		for details in &orders {
			let parameters = &details.order.parameters;
			ensure_consideration(&parameters.offer, &parameters.consideration)?;
		}
		let fulfiller = self.account_address().await?;
		let fulfiller_operator = self.conduit_operator(options.conduit_key)?;

		let (counters, offerer_operators) = futures::try_join!(
			try_join_all(
				orders
					.iter()
					.map(|details| self.contract.get_counter(details.order.parameters.offerer))
			),
			try_join_all(
				orders
					.iter()
					.map(|details| self.offerer_operator(&details.order.parameters))
			),
		)?;

		let mut paid_keys = Vec::new();
		let mut offer_keys = Vec::with_capacity(orders.len());
		for details in &orders {
			let submitted = with_tips(&details.order, &details.tips);
			paid_keys.extend(side_requirements(
				&submitted.parameters,
				&details.criteria,
				Side::Consideration,
				None,
			)?);
			offer_keys.push(side_requirements(
				&submitted.parameters,
				&details.criteria,
				Side::Offer,
				None,
			)?);
		}
		let offerer_operator_lists: Vec<Vec<Address>> = offerer_operators
			.iter()
			.map(|operator| operator.iter().copied().collect())
			.collect();

		let fulfiller_operators = [fulfiller_operator];
		let hashes: Vec<B256> = orders
			.iter()
			.zip(&counters)
			.map(|(details, counter)| order_hash(&details.order.parameters.to_components(*counter)))
			.collect();

		let (statuses, fulfiller_snapshot, offerer_snapshots, now) = futures::try_join!(
			try_join_all(hashes.iter().map(|hash| self.contract.get_order_status(*hash))),
			self.balances
				.snapshot(fulfiller, &paid_keys, &fulfiller_operators),
			try_join_all(orders.iter().zip(&offer_keys).zip(&offerer_operator_lists).map(
				|((details, keys), operators)| {
					self.balances
						.snapshot(details.order.parameters.offerer, keys, operators)
				}
			)),
			self.latest_timestamp(),
		)?;

		let signed: Vec<&Order> = orders.iter().map(|details| &details.order).collect();
		let validated: Vec<bool> = statuses.iter().map(|status| status.is_validated).collect();
		ensure_signatures(&signed, &validated)?;

		let mut prepared = Vec::with_capacity(orders.len());
		let mut paid = Vec::new();
		let mut received = Vec::new();
		let mut value = U256::ZERO;
		for (index, details) in orders.iter().enumerate() {
			let order = prepare_order(details, &statuses[index])?;
			let consideration_time = self.time_params(&order.moving, now, true);
			let offer_time = self.time_params(&order.moving, now, false);

			check_offerer(
				&order.moving,
				&order.criteria,
				&offerer_snapshots[index],
				offerer_operators[index],
				&offer_time,
			)?;
			paid.extend(side_requirements(
				&order.moving,
				&order.criteria,
				Side::Consideration,
				Some(&consideration_time),
			)?);
			if options.recipient.map_or(true, |r| r == fulfiller) {
				received.extend(side_requirements(
					&order.moving,
					&order.criteria,
					Side::Offer,
					Some(&offer_time),
				)?);
			}
			value = value.saturating_add(native_consideration_total(
				&order.moving.consideration,
				Some(&consideration_time),
			));
			prepared.push(order);
		}

		check_balances(&net_requirements(&paid, &received), &fulfiller_snapshot)?;
		let plan = self
			.planner
			.plan(&paid, &fulfiller_snapshot, &Operators::direct(fulfiller_operator));

		let submitted: Vec<&OrderParameters> =
			prepared.iter().map(|order| &order.submitted.parameters).collect();
		let criteria: Vec<OrderCriteria> = prepared.iter().map(|order| order.criteria.clone()).collect();
		let resolvers = generate_criteria_resolvers(&submitted, &criteria)?;
		let fulfillments = fulfill_available_fulfillments(&submitted, &criteria)?;
		let advanced: Vec<AdvancedOrder> = prepared.iter().map(PreparedOrder::advanced).collect();

		let transaction = self.contract.fulfill_available_advanced_orders_tx(
			fulfiller,
			&advanced,
			&resolvers,
			&fulfillments,
			options.conduit_key,
			options.recipient.unwrap_or(Address::ZERO),
			U256::from(advanced.len()),
			value,
			options.domain.as_deref(),
		)?;

		tracing::info!(
			fulfiller = %fulfiller,
			orders = advanced.len(),
			offer_groups = fulfillments.offer_fulfillments.len(),
			consideration_groups = fulfillments.consideration_fulfillments.len(),
			value = %value,
			approvals = plan.approvals.len(),
			"Planned batch fulfillment"
		);
		let warnings = prepared
			.iter()
			.flat_map(|order| invalid_proofs(&order.submitted.parameters, &order.criteria))
			.collect();
		Ok(OrderUseCase::exchange(plan.approvals, transaction).with_warnings(warnings))
	}

	/// Plans `matchOrders` (or `matchAdvancedOrders` when criteria are
	/// involved) over `input.orders`.
	///
	/// Orders offered by the caller need no signature. The caller pays the
	/// native currency its own orders offer and approves their other offer
	/// items.
	pub async fn match_orders(
		&self,
		input: MatchOrdersInput,
	) -> Result<OrderUseCase<Exchange>, SeaportError> {
		if input.orders.is_empty() {
			return Err(OrderError::Validation("no orders to match".into()).into());
		}
		let caller = self.account_address().await?;
		let own: Vec<usize> = input
			.orders
			.iter()
			.enumerate()
			.filter(|(_, order)| order.parameters.offerer == caller)
			.map(|(index, _)| index)
			.collect();

		let (counters, own_operators) = futures::try_join!(
			try_join_all(
				input
					.orders
					.iter()
					.map(|order| self.contract.get_counter(order.parameters.offerer))
			),
			try_join_all(
				own.iter()
					.map(|&index| self.own_order_operator(&input.orders[index].parameters))
			),
		)?;

		let empty = OrderCriteria::default();
		let criteria_of = |index: usize| input.criteria.get(index).unwrap_or(&empty);

		let mut keys = Vec::new();
		for &index in &own {
			keys.extend(side_requirements(
				&input.orders[index].parameters,
				criteria_of(index),
				Side::Offer,
				None,
			)?);
		}
		let mut operators: Vec<Address> = Vec::new();
		for operator in &own_operators {
			if !operators.contains(operator) {
				operators.push(*operator);
			}
		}

		let hashes: Vec<B256> = input
			.orders
			.iter()
			.zip(&counters)
			.map(|(order, counter)| order_hash(&order.parameters.to_components(*counter)))
			.collect();

		let (statuses, snapshot, now) = futures::try_join!(
			try_join_all(hashes.iter().map(|hash| self.contract.get_order_status(*hash))),
			self.balances.snapshot(caller, &keys, &operators),
			self.latest_timestamp(),
		)?;

		for status in &statuses {
			ensure_fillable(status)?;
		}
		let orders: Vec<&Order> = input.orders.iter().collect();
		let validated: Vec<bool> = statuses
			.iter()
			.zip(&input.orders)
			.map(|(status, order)| status.is_validated || order.parameters.offerer == caller)
			.collect();
		ensure_signatures(&orders, &validated)?;

		let parameters: Vec<&OrderParameters> = input.orders.iter().map(|o| &o.parameters).collect();
		let fulfillments = match input.fulfillments {
			Some(fulfillments) => fulfillments,
			None => match_fulfillments(&parameters, &input.criteria)?,
		};

		// caller's offer items, grouped by the operator that moves them
		let mut groups: Vec<(Address, Vec<ItemRequirement>)> = Vec::new();
		let mut value = U256::ZERO;
		for (&index, &operator) in own.iter().zip(&own_operators) {
			let order = &input.orders[index].parameters;
			let offer_time = self.time_params(order, now, false);
			let requirements =
				side_requirements(order, criteria_of(index), Side::Offer, Some(&offer_time))?;
			value = requirements
				.iter()
				.filter(|r| r.item_type.is_native())
				.fold(value, |acc, r| acc.saturating_add(r.amount));
			match groups.iter_mut().find(|(op, _)| *op == operator) {
				Some((_, group)) => group.extend(requirements),
				None => groups.push((operator, requirements)),
			}
		}

		let all: Vec<ItemRequirement> = groups.iter().flat_map(|(_, reqs)| reqs.clone()).collect();
		check_balances(&all, &snapshot)?;
		let approvals: Vec<ApprovalAction> = groups
			.iter()
			.flat_map(|(operator, requirements)| {
				self.planner
					.plan(requirements, &snapshot, &Operators::direct(*operator))
					.approvals
			})
			.collect();

		let domain = input.domain.as_deref();
		let uses_criteria = parameters.iter().any(|order| {
			order.offer.iter().any(|i| i.item_type.is_criteria())
				|| order.consideration.iter().any(|i| i.item_type.is_criteria())
		});
		let transaction = if uses_criteria {
			let resolvers = generate_criteria_resolvers(&parameters, &input.criteria)?;
			let advanced: Vec<AdvancedOrder> = input.orders.iter().map(AdvancedOrder::full).collect();
			self.contract.match_advanced_orders_tx(
				caller,
				&advanced,
				&resolvers,
				&fulfillments,
				value,
				domain,
			)?
		} else {
			self.contract
				.match_orders_tx(caller, &input.orders, &fulfillments, value, domain)
		};

		tracing::info!(
			caller = %caller,
			orders = input.orders.len(),
			fulfillments = fulfillments.len(),
			value = %value,
			approvals = approvals.len(),
			"Planned match"
		);
		let warnings = parameters
			.iter()
			.enumerate()
			.flat_map(|(index, order)| invalid_proofs(order, criteria_of(index)))
			.collect();
		Ok(OrderUseCase::exchange(approvals, transaction).with_warnings(warnings))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use seaport_types::{InputCriteria, ItemType, OfferItem, OrderType};

	const OFFERER: Address = Address::new([0x01; 20]);
	const BUYER: Address = Address::new([0x02; 20]);
	const NFT: Address = Address::new([0x72; 20]);

	fn eth(amount: u64, recipient: Address) -> ConsiderationItem {
		ConsiderationItem {
			item_type: ItemType::Native,
			token: Address::ZERO,
			identifier_or_criteria: U256::ZERO,
			start_amount: U256::from(amount),
			end_amount: U256::from(amount),
			recipient,
		}
	}

	fn listing(order_type: OrderType, amount: u64) -> Order {
		let offer = vec![OfferItem {
			item_type: ItemType::Erc1155,
			token: NFT,
			identifier_or_criteria: U256::from(1),
			start_amount: U256::from(amount),
			end_amount: U256::from(amount),
		}];
		let consideration = vec![eth(10 * amount, OFFERER)];
		Order {
			parameters: OrderParameters {
				offerer: OFFERER,
				zone: Address::ZERO,
				total_original_consideration_items: U256::from(consideration.len()),
				offer,
				consideration,
				order_type,
				start_time: U256::ZERO,
				end_time: U256::MAX,
				zone_hash: B256::ZERO,
				salt: U256::from(1),
				conduit_key: B256::ZERO,
			},
			signature: Bytes::from(vec![1u8; 65]),
		}
	}

	#[test]
	fn test_tips_keep_original_length() {
		let order = listing(OrderType::FullOpen, 1);
		let tipped = with_tips(&order, &[eth(1, BUYER)]);
		assert_eq!(tipped.parameters.consideration.len(), 2);
		assert_eq!(tipped.parameters.total_original_consideration_items, U256::from(1));
		assert_eq!(
			tipped.parameters.to_components(U256::ZERO),
			order.parameters.to_components(U256::ZERO)
		);
	}

	#[test]
	fn test_prepare_scales_partial_fills() {
		let mut details = OrderDetails::new(listing(OrderType::PartialOpen, 4));
		details.units_to_fill = Some(U256::from(1));
		details.tips = vec![eth(4, BUYER)];

		let prepared = prepare_order(&details, &OrderStatus::default()).unwrap();
		assert!(!prepared.is_complete_fill());
		assert_eq!(prepared.moving.offer[0].start_amount, U256::from(1));
		assert_eq!(prepared.moving.consideration[0].start_amount, U256::from(10));
		assert_eq!(prepared.moving.consideration[1].start_amount, U256::from(1));

		let advanced = prepared.advanced();
		assert_eq!(advanced.numerator, U256::from(1));
		assert_eq!(advanced.denominator, U256::from(4));
	}

	#[test]
	fn test_prepare_refuses_unfillable_orders() {
		let mut details = OrderDetails::new(listing(OrderType::FullOpen, 4));
		details.units_to_fill = Some(U256::from(1));
		assert!(prepare_order(&details, &OrderStatus::default()).is_err());

		let details = OrderDetails::new(listing(OrderType::FullOpen, 1));
		let cancelled = OrderStatus {
			is_cancelled: true,
			..OrderStatus::default()
		};
		assert!(prepare_order(&details, &cancelled).is_err());

		let filled = OrderStatus {
			is_validated: true,
			is_cancelled: false,
			total_filled: U256::from(1),
			total_size: U256::from(1),
		};
		assert!(prepare_order(&details, &filled).is_err());
	}

	#[test]
	fn test_remaining_fill_after_partial_status() {
		let details = OrderDetails::new(listing(OrderType::PartialOpen, 4));
		let status = OrderStatus {
			is_validated: true,
			is_cancelled: false,
			total_filled: U256::from(1),
			total_size: U256::from(4),
		};
		let prepared = prepare_order(&details, &status).unwrap();
		assert_eq!(prepared.moving.offer[0].start_amount, U256::from(3));
	}

	#[test]
	fn test_private_listing_detection() {
		let mut order = listing(OrderType::FullOpen, 1);
		assert!(!is_private_listing(&order.parameters, BUYER));

		order.parameters.consideration.push(ConsiderationItem {
			item_type: ItemType::Erc1155,
			token: NFT,
			identifier_or_criteria: U256::from(1),
			start_amount: U256::from(1),
			end_amount: U256::from(1),
			recipient: BUYER,
		});
		assert!(is_private_listing(&order.parameters, BUYER));
		assert!(!is_private_listing(&order.parameters, OFFERER));
	}

	#[test]
	fn test_side_requirements_resolve_criteria() {
		let mut order = listing(OrderType::FullOpen, 1).parameters;
		order.offer[0].item_type = ItemType::Erc1155WithCriteria;
		order.offer[0].identifier_or_criteria = U256::ZERO;

		assert!(side_requirements(&order, &OrderCriteria::default(), Side::Offer, None).is_err());

		let criteria = OrderCriteria {
			offer: vec![InputCriteria {
				identifier: U256::from(42),
				proof: vec![],
			}],
			consideration: vec![],
		};
		let requirements = side_requirements(&order, &criteria, Side::Offer, None).unwrap();
		assert_eq!(requirements[0].identifier, Some(U256::from(42)));
	}
}
