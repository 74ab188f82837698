//! Cancelling and validating orders on-chain.

use crate::actions::{Exchange, OrderUseCase};
use crate::approval::Operators;
use crate::balance::{check_balances, ItemRequirement};
use crate::{Seaport, SeaportError};
use alloy::primitives::{Address, U256};
use futures::future::try_join_all;
use seaport_order::OrderError;
use seaport_types::{Order, OrderComponents};

impl Seaport {
	/// Cancels `orders`. The caller must be the offerer or the zone of each.
	pub async fn cancel_orders(
		&self,
		orders: Vec<OrderComponents>,
	) -> Result<OrderUseCase<Exchange>, SeaportError> {
		if orders.is_empty() {
			return Err(OrderError::Validation("no orders to cancel".into()).into());
		}
		let caller = self.account_address().await?;
		if let Some(foreign) = orders
			.iter()
			.find(|order| order.offerer != caller && order.zone != caller)
		{
			return Err(OrderError::Validation(format!(
				"{} is neither offerer nor zone of an order offered by {}",
				caller, foreign.offerer
			))
			.into());
		}

		tracing::info!(caller = %caller, orders = orders.len(), "Planned cancellation");
		let transaction = self.contract.cancel_tx(caller, &orders);
		Ok(OrderUseCase::exchange(Vec::new(), transaction))
	}

	/// Cancels every open order of the caller by incrementing its counter.
	pub async fn bulk_cancel_orders(&self) -> Result<OrderUseCase<Exchange>, SeaportError> {
		let caller = self.account_address().await?;
		tracing::info!(caller = %caller, "Planned counter increment");
		Ok(OrderUseCase::exchange(
			Vec::new(),
			self.contract.increment_counter_tx(caller),
		))
	}

	/// Validates the caller's `orders` on-chain so they can be fulfilled
	/// without a signature. Missing approvals for the offered items come
	/// first.
	pub async fn validate(&self, orders: Vec<Order>) -> Result<OrderUseCase<Exchange>, SeaportError> {
		if orders.is_empty() {
			return Err(OrderError::Validation("no orders to validate".into()).into());
		}
		let offerer = self.account_address().await?;
		if let Some(index) = orders
			.iter()
			.position(|order| order.parameters.offerer != offerer)
		{
			return Err(OrderError::Validation(format!(
				"order {} is not offered by {}",
				index, offerer
			))
			.into());
		}

		// one operator per order; legacy proxy orders need the caller's proxy
		let proxy = if orders.iter().any(|o| o.parameters.order_type.is_via_proxy()) {
			self.proxy_of(offerer).await?
		} else {
			None
		};
		let mut groups: Vec<(Address, Vec<ItemRequirement>)> = Vec::new();
		for order in &orders {
			let operator = if order.parameters.order_type.is_via_proxy() {
				proxy.ok_or_else(|| {
					SeaportError::Configuration(format!("{} has no registered proxy", offerer))
				})?
			} else {
				self.conduit_operator(order.parameters.conduit_key)?
			};
			let requirements: Vec<ItemRequirement> = order
				.parameters
				.offer
				.iter()
				.map(|item| ItemRequirement::for_item(item, None, None))
				.collect();
			match groups.iter_mut().find(|(op, _)| *op == operator) {
				Some((_, group)) => group.extend(requirements),
				None => groups.push((operator, requirements)),
			}
		}

		let all: Vec<ItemRequirement> = groups.iter().flat_map(|(_, reqs)| reqs.clone()).collect();
		let operators: Vec<Address> = groups.iter().map(|(operator, _)| *operator).collect();
		let snapshot = self.balances.snapshot(offerer, &all, &operators).await?;
		check_balances(&all, &snapshot)?;

		let approvals = groups
			.iter()
			.flat_map(|(operator, requirements)| {
				self.planner
					.plan(requirements, &snapshot, &Operators::direct(*operator))
					.approvals
			})
			.collect::<Vec<_>>();

		tracing::info!(
			offerer = %offerer,
			orders = orders.len(),
			approvals = approvals.len(),
			"Planned validation"
		);
		let transaction = self.contract.validate_tx(offerer, &orders);
		Ok(OrderUseCase::exchange(approvals, transaction))
	}

	/// Current counter of each of `offerers`, read concurrently.
	pub async fn get_counters(
		&self,
		offerers: &[Address],
	) -> Result<Vec<U256>, SeaportError> {
		try_join_all(offerers.iter().map(|offerer| self.contract.get_counter(*offerer))).await
	}
}
