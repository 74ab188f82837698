//! Balance and approval reads.
//!
//! Each planning pass takes one [`BalanceSnapshot`] per account: every
//! balance and approval the pass needs is requested concurrently and awaited
//! in full before any decision is made. Snapshots are never reused across
//! passes.

use crate::contract::{decode_returns, view_call};
use crate::SeaportError;
use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use futures::future::try_join_all;
use seaport_delivery::DeliveryService;
use seaport_order::amount::current_item_amount;
use seaport_order::{OrderError, TimeBasedItemParams};
use seaport_types::abi::{IERC1155, IERC20, IERC721};
use seaport_types::{Item, ItemType};
use std::collections::HashMap;
use std::sync::Arc;

/// Amount of one item an account has to provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequirement {
	pub item_type: ItemType,
	pub token: Address,
	/// Concrete identifier; `None` for criteria items that were not resolved.
	pub identifier: Option<U256>,
	pub amount: U256,
}

/// Balance lookup key: criteria items count as their plain counterpart.
type BalanceKey = (ItemType, Address, Option<U256>);

impl ItemRequirement {
	pub fn new(item_type: ItemType, token: Address, identifier: Option<U256>, amount: U256) -> Self {
		Self {
			item_type,
			token,
			identifier,
			amount,
		}
	}

	/// Requirement for moving `item` at `params`, or its larger amount when
	/// `params` is absent. Criteria items take `identifier` once resolved.
	pub fn for_item<I: Item>(
		item: &I,
		identifier: Option<U256>,
		params: Option<&TimeBasedItemParams>,
	) -> Self {
		let identifier = if item.item_type().is_criteria() {
			identifier
		} else {
			Some(item.identifier_or_criteria())
		};
		Self::new(
			item.item_type(),
			item.token(),
			identifier,
			current_item_amount(item, params),
		)
	}

	fn key(&self) -> BalanceKey {
		let identifier = if self.item_type.is_currency() {
			Some(U256::ZERO)
		} else {
			self.identifier
		};
		(self.item_type.resolved(), self.token, identifier)
	}
}

/// Sums requirements sharing a key, keeping first-seen order.
pub fn aggregate_requirements(requirements: &[ItemRequirement]) -> Vec<ItemRequirement> {
	let mut index: HashMap<BalanceKey, usize> = HashMap::new();
	let mut merged: Vec<ItemRequirement> = Vec::new();

	for requirement in requirements {
		match index.get(&requirement.key()) {
			Some(&position) => {
				let existing = &mut merged[position];
				existing.amount = existing.amount.saturating_add(requirement.amount);
			}
			None => {
				index.insert(requirement.key(), merged.len());
				merged.push(requirement.clone());
			}
		}
	}
	merged
}

/// What an account still has to hold after receiving `received` first.
///
/// Offer items reach the fulfiller before consideration items leave it, so
/// received amounts offset payments of the same item.
pub fn net_requirements(
	paid: &[ItemRequirement],
	received: &[ItemRequirement],
) -> Vec<ItemRequirement> {
	let received = aggregate_requirements(received);
	aggregate_requirements(paid)
		.into_iter()
		.filter_map(|mut requirement| {
			if let Some(incoming) = received.iter().find(|r| r.key() == requirement.key()) {
				requirement.amount = requirement.amount.saturating_sub(incoming.amount);
			}
			(!requirement.amount.is_zero()).then_some(requirement)
		})
		.collect()
}

/// Balances and approvals of one account at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
	pub owner: Address,
	pub chain_id: u64,
	pub native_balance: U256,
	balances: HashMap<BalanceKey, U256>,
	approvals: HashMap<(Address, Address), U256>,
}

impl BalanceSnapshot {
	pub fn new(owner: Address, chain_id: u64) -> Self {
		Self {
			owner,
			chain_id,
			native_balance: U256::ZERO,
			balances: HashMap::new(),
			approvals: HashMap::new(),
		}
	}

	pub fn set_balance(&mut self, requirement: &ItemRequirement, balance: U256) {
		self.balances.insert(requirement.key(), balance);
	}

	/// Records the amount `operator` may move of `token`; NFT approvals are
	/// all-or-nothing and stored as `U256::MAX` or zero.
	pub fn set_approval(&mut self, token: Address, operator: Address, amount: U256) {
		self.approvals.insert((token, operator), amount);
	}

	/// Held amount of the item, `None` when it could not be read.
	pub fn balance(&self, requirement: &ItemRequirement) -> Option<U256> {
		if requirement.item_type.is_native() {
			return Some(self.native_balance);
		}
		self.balances.get(&requirement.key()).copied()
	}

	pub fn approved_amount(&self, token: Address, operator: Address) -> U256 {
		self.approvals
			.get(&(token, operator))
			.copied()
			.unwrap_or_default()
	}

	/// True when `operator` may move `requirement.amount` of the item.
	pub fn is_approved(&self, requirement: &ItemRequirement, operator: Address) -> bool {
		if requirement.item_type.is_native() {
			return true;
		}
		let approved = self.approved_amount(requirement.token, operator);
		!approved.is_zero() && approved >= requirement.amount
	}
}

/// Fails with [`OrderError::InsufficientBalance`] on the first item the
/// snapshot's owner cannot cover. Items whose balance is unknown are skipped.
pub fn check_balances(
	requirements: &[ItemRequirement],
	snapshot: &BalanceSnapshot,
) -> Result<(), OrderError> {
	for requirement in aggregate_requirements(requirements) {
		let Some(balance) = snapshot.balance(&requirement) else {
			continue;
		};
		if balance < requirement.amount {
			return Err(OrderError::InsufficientBalance(format!(
				"{} holds {} of {} token {} but {} is required",
				snapshot.owner, balance, requirement.item_type, requirement.token, requirement.amount
			)));
		}
	}
	Ok(())
}

/// Reads balances and approvals through the delivery provider.
#[derive(Clone)]
pub struct BalanceReader {
	delivery: Arc<DeliveryService>,
	chain_id: u64,
}

impl BalanceReader {
	pub fn new(delivery: Arc<DeliveryService>, chain_id: u64) -> Self {
		Self { delivery, chain_id }
	}

	async fn read<C: SolCall>(&self, token: Address, call: C) -> Result<C::Return, SeaportError> {
		let tx = view_call(token, call.abi_encode(), self.chain_id);
		let data = self.delivery.call(&tx).await?;
		decode_returns::<C>(&data)
	}

	/// Balance of one item; `None` for ERC1155 criteria items without a
	/// resolved identifier, which cannot be read.
	pub async fn balance_of(
		&self,
		owner: Address,
		requirement: &ItemRequirement,
	) -> Result<Option<U256>, SeaportError> {
		let token = requirement.token;
		let balance = match (requirement.item_type.resolved(), requirement.identifier) {
			(ItemType::Native, _) => self.delivery.native_balance(owner).await?,
			(ItemType::Erc20, _) => self.read(token, IERC20::balanceOfCall { account: owner }).await?,
			(ItemType::Erc721, Some(token_id)) => {
				let holder = self.read(token, IERC721::ownerOfCall { tokenId: token_id }).await?;
				U256::from(u8::from(holder == owner))
			}
			(ItemType::Erc721, None) => self.read(token, IERC721::balanceOfCall { owner }).await?,
			(ItemType::Erc1155, Some(id)) => {
				self.read(token, IERC1155::balanceOfCall { account: owner, id })
					.await?
			}
			_ => return Ok(None),
		};
		Ok(Some(balance))
	}

	/// Amount `operator` may move on behalf of `owner`.
	pub async fn approved_amount(
		&self,
		owner: Address,
		item_type: ItemType,
		token: Address,
		operator: Address,
	) -> Result<U256, SeaportError> {
		let approved_for_all = match item_type.resolved() {
			ItemType::Native => return Ok(U256::MAX),
			ItemType::Erc20 => {
				return self
					.read(token, IERC20::allowanceCall { owner, spender: operator })
					.await
			}
			ItemType::Erc721 => {
				self.read(token, IERC721::isApprovedForAllCall { owner, operator })
					.await?
			}
			_ => {
				self.read(
					token,
					IERC1155::isApprovedForAllCall {
						account: owner,
						operator,
					},
				)
				.await?
			}
		};
		Ok(if approved_for_all { U256::MAX } else { U256::ZERO })
	}

	/// Reads everything `requirements` need for `owner` against each of
	/// `operators` in one concurrent batch.
	pub async fn snapshot(
		&self,
		owner: Address,
		requirements: &[ItemRequirement],
		operators: &[Address],
	) -> Result<BalanceSnapshot, SeaportError> {
		let items: Vec<ItemRequirement> = aggregate_requirements(requirements)
			.into_iter()
			.filter(|r| !r.item_type.is_native())
			.collect();

		let mut approval_targets: Vec<(ItemType, Address, Address)> = Vec::new();
		for item in &items {
			for &operator in operators {
				let target = (item.item_type, item.token, operator);
				if !approval_targets
					.iter()
					.any(|(_, token, op)| *token == item.token && *op == operator)
				{
					approval_targets.push(target);
				}
			}
		}

		let (native_balance, balances, approvals) = futures::try_join!(
			async { Ok::<_, SeaportError>(self.delivery.native_balance(owner).await?) },
			try_join_all(items.iter().map(|item| self.balance_of(owner, item))),
			try_join_all(
				approval_targets
					.iter()
					.map(|(item_type, token, operator)| {
						self.approved_amount(owner, *item_type, *token, *operator)
					})
			),
		)?;

		let mut snapshot = BalanceSnapshot::new(owner, self.chain_id);
		snapshot.native_balance = native_balance;
		for (item, balance) in items.iter().zip(balances) {
			if let Some(balance) = balance {
				snapshot.set_balance(item, balance);
			}
		}
		for ((_, token, operator), amount) in approval_targets.into_iter().zip(approvals) {
			snapshot.set_approval(token, operator, amount);
		}

		tracing::debug!(
			owner = %owner,
			items = items.len(),
			operators = operators.len(),
			"Read balance snapshot"
		);
		Ok(snapshot)
	}
}
