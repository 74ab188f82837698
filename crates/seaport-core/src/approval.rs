//! Approval planning.
//!
//! Given the items an account must let an operator move, the planner picks
//! the operator (the settlement contract or conduit, or a legacy proxy) and
//! emits the minimal list of approval actions, in first-encounter order.

use crate::balance::{BalanceSnapshot, ItemRequirement};
use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use seaport_types::abi::{IERC1155, IERC20, IERC721};
use seaport_types::{ApprovalStrategy, ItemType, Transaction, MAX_INT};

/// Operators an account could approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operators {
	/// The settlement contract, or the conduit selected by the conduit key.
	pub direct: Address,
	/// Legacy proxy registered for the account.
	pub proxy: Option<Address>,
}

impl Operators {
	pub fn direct(direct: Address) -> Self {
		Self {
			direct,
			proxy: None,
		}
	}

	pub fn all(&self) -> Vec<Address> {
		std::iter::once(self.direct).chain(self.proxy).collect()
	}
}

/// One approval transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalAction {
	pub token: Address,
	pub identifier: U256,
	pub item_type: ItemType,
	pub operator: Address,
	pub transaction: Transaction,
}

impl ApprovalAction {
	/// `approve(operator, MAX)` for ERC20 tokens, `setApprovalForAll(operator,
	/// true)` for NFT contracts.
	pub fn new(owner: Address, chain_id: u64, requirement: &ItemRequirement, operator: Address) -> Self {
		let data = match requirement.item_type.resolved() {
			ItemType::Erc20 => IERC20::approveCall {
				spender: operator,
				value: MAX_INT,
			}
			.abi_encode(),
			ItemType::Erc1155 => IERC1155::setApprovalForAllCall {
				operator,
				approved: true,
			}
			.abi_encode(),
			_ => IERC721::setApprovalForAllCall {
				operator,
				approved: true,
			}
			.abi_encode(),
		};

		Self {
			token: requirement.token,
			identifier: requirement.identifier.unwrap_or_default(),
			item_type: requirement.item_type,
			operator,
			transaction: Transaction::call(owner, requirement.token, data, chain_id),
		}
	}
}

/// Outcome of a planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPlan {
	pub operator: Address,
	pub uses_proxy: bool,
	pub approvals: Vec<ApprovalAction>,
}

/// Plans approvals under a fixed [`ApprovalStrategy`].
#[derive(Debug, Clone, Copy)]
pub struct ApprovalPlanner {
	strategy: ApprovalStrategy,
}

impl ApprovalPlanner {
	pub fn new(strategy: ApprovalStrategy) -> Self {
		Self { strategy }
	}

	pub fn strategy(&self) -> ApprovalStrategy {
		self.strategy
	}

	pub fn plan(
		&self,
		requirements: &[ItemRequirement],
		snapshot: &BalanceSnapshot,
		operators: &Operators,
	) -> ApprovalPlan {
		let per_token = totals_per_token(requirements);
		let covers = |operator: Address| per_token.iter().all(|r| snapshot.is_approved(r, operator));

		let proxy = match (self.strategy, operators.proxy) {
			(ApprovalStrategy::NeverProxy, _) | (_, None) => None,
			(ApprovalStrategy::AlwaysProxy, Some(proxy)) => Some(proxy),
			(ApprovalStrategy::PreferExisting, Some(proxy)) => {
				(covers(proxy) && !covers(operators.direct)).then_some(proxy)
			}
		};
		let operator = proxy.unwrap_or(operators.direct);

		let approvals: Vec<ApprovalAction> = per_token
			.iter()
			.filter(|requirement| !snapshot.is_approved(requirement, operator))
			.map(|requirement| {
				ApprovalAction::new(snapshot.owner, snapshot.chain_id, requirement, operator)
			})
			.collect();

		tracing::debug!(
			owner = %snapshot.owner,
			operator = %operator,
			uses_proxy = proxy.is_some(),
			approvals = approvals.len(),
			"Planned approvals"
		);

		ApprovalPlan {
			operator,
			uses_proxy: proxy.is_some(),
			approvals,
		}
	}
}

/// One entry per token contract in first-encounter order, amounts summed.
/// Native items never need approval and are dropped.
fn totals_per_token(requirements: &[ItemRequirement]) -> Vec<ItemRequirement> {
	let mut totals: Vec<ItemRequirement> = Vec::new();
	for requirement in requirements.iter().filter(|r| !r.item_type.is_native()) {
		match totals.iter_mut().find(|t| t.token == requirement.token) {
			Some(total) => total.amount = total.amount.saturating_add(requirement.amount),
			None => totals.push(requirement.clone()),
		}
	}
	totals
}

#[cfg(test)]
mod tests {
	use super::*;

	const OWNER: Address = Address::new([0x01; 20]);
	const SEAPORT: Address = Address::new([0x5e; 20]);
	const PROXY: Address = Address::new([0x9a; 20]);

	fn requirement(item_type: ItemType, token: u8, id: u64, amount: u64) -> ItemRequirement {
		ItemRequirement::new(
			item_type,
			Address::repeat_byte(token),
			Some(U256::from(id)),
			U256::from(amount),
		)
	}

	fn requirements() -> Vec<ItemRequirement> {
		vec![
			requirement(ItemType::Erc721, 0x72, 1, 1),
			requirement(ItemType::Native, 0x00, 0, 5),
			requirement(ItemType::Erc20, 0x20, 0, 100),
			requirement(ItemType::Erc721, 0x72, 2, 1),
			requirement(ItemType::Erc1155, 0x11, 7, 3),
		]
	}

	#[test]
	fn test_one_approval_per_token_in_encounter_order() {
		let snapshot = BalanceSnapshot::new(OWNER, 1);
		let plan = ApprovalPlanner::new(ApprovalStrategy::PreferExisting).plan(
			&requirements(),
			&snapshot,
			&Operators::direct(SEAPORT),
		);

		let tokens: Vec<Address> = plan.approvals.iter().map(|a| a.token).collect();
		assert_eq!(
			tokens,
			vec![
				Address::repeat_byte(0x72),
				Address::repeat_byte(0x20),
				Address::repeat_byte(0x11)
			]
		);
		assert!(plan.approvals.iter().all(|a| a.operator == SEAPORT));
		assert_eq!(
			plan.approvals[1].transaction.selector(),
			Some(IERC20::approveCall::SELECTOR)
		);
		assert_eq!(
			plan.approvals[0].transaction.selector(),
			Some(IERC721::setApprovalForAllCall::SELECTOR)
		);
	}

	#[test]
	fn test_plan_is_deterministic() {
		let snapshot = BalanceSnapshot::new(OWNER, 1);
		let planner = ApprovalPlanner::new(ApprovalStrategy::PreferExisting);
		let operators = Operators::direct(SEAPORT);
		assert_eq!(
			planner.plan(&requirements(), &snapshot, &operators),
			planner.plan(&requirements(), &snapshot, &operators)
		);
	}

	#[test]
	fn test_granting_an_approval_shortens_the_plan() {
		let mut snapshot = BalanceSnapshot::new(OWNER, 1);
		let planner = ApprovalPlanner::new(ApprovalStrategy::PreferExisting);
		let operators = Operators::direct(SEAPORT);

		let first = planner.plan(&requirements(), &snapshot, &operators);
		let granted = &first.approvals[0];
		snapshot.set_approval(granted.token, granted.operator, U256::MAX);

		let second = planner.plan(&requirements(), &snapshot, &operators);
		assert_eq!(second.approvals.len(), first.approvals.len() - 1);
		assert_eq!(second.approvals[..], first.approvals[1..]);
	}

	#[test]
	fn test_erc20_allowance_covers_summed_amounts() {
		let reqs = vec![
			requirement(ItemType::Erc20, 0x20, 0, 60),
			requirement(ItemType::Erc20, 0x20, 0, 60),
		];
		let mut snapshot = BalanceSnapshot::new(OWNER, 1);
		snapshot.set_approval(Address::repeat_byte(0x20), SEAPORT, U256::from(100));

		let plan = ApprovalPlanner::new(ApprovalStrategy::NeverProxy).plan(
			&reqs,
			&snapshot,
			&Operators::direct(SEAPORT),
		);
		assert_eq!(plan.approvals.len(), 1);
	}

	#[test]
	fn test_strategies() {
		let operators = Operators {
			direct: SEAPORT,
			proxy: Some(PROXY),
		};
		let mut snapshot = BalanceSnapshot::new(OWNER, 1);
		for r in requirements() {
			snapshot.set_approval(r.token, PROXY, U256::MAX);
		}

		let prefer = ApprovalPlanner::new(ApprovalStrategy::PreferExisting).plan(
			&requirements(),
			&snapshot,
			&operators,
		);
		assert!(prefer.uses_proxy);
		assert!(prefer.approvals.is_empty());

		let never = ApprovalPlanner::new(ApprovalStrategy::NeverProxy).plan(
			&requirements(),
			&snapshot,
			&operators,
		);
		assert!(!never.uses_proxy);
		assert_eq!(never.approvals.len(), 3);

		// existing direct approvals win under PreferExisting
		for r in requirements() {
			snapshot.set_approval(r.token, SEAPORT, U256::MAX);
		}
		let prefer = ApprovalPlanner::new(ApprovalStrategy::PreferExisting).plan(
			&requirements(),
			&snapshot,
			&operators,
		);
		assert!(!prefer.uses_proxy);

		let always = ApprovalPlanner::new(ApprovalStrategy::AlwaysProxy).plan(
			&requirements(),
			&BalanceSnapshot::new(OWNER, 1),
			&operators,
		);
		assert!(always.uses_proxy);
		assert!(always.approvals.iter().all(|a| a.operator == PROXY));

		let no_proxy = ApprovalPlanner::new(ApprovalStrategy::AlwaysProxy).plan(
			&requirements(),
			&BalanceSnapshot::new(OWNER, 1),
			&Operators::direct(SEAPORT),
		);
		assert!(!no_proxy.uses_proxy);
	}
}
