//! Ordered, resumable action lists.
//!
//! Every high-level operation returns an [`OrderUseCase`]: zero or more
//! approvals followed by exactly one terminal action that either signs a new
//! order or submits an exchange call. The caller drives it one step at a time
//! with [`OrderUseCase::execute_next`] or runs it to the end with
//! [`OrderUseCase::execute_all_actions`]. Dropping a use case part way
//! leaves already granted approvals in place.

use crate::approval::ApprovalAction;
use crate::SeaportError;
use alloy::primitives::B256;
use alloy::sol_types::Eip712Domain;
use async_trait::async_trait;
use seaport_order::hash::order_signing_hash;
use seaport_order::OrderError;
use seaport_types::{OrderComponents, OrderWithCounter, Transaction, TransactionReceipt};
use std::collections::VecDeque;
use std::marker::PhantomData;

/// Signs a freshly built order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderAction {
	pub components: OrderComponents,
	pub domain: Eip712Domain,
}

impl CreateOrderAction {
	/// Digest the offerer signs.
	pub fn signing_hash(&self) -> B256 {
		order_signing_hash(&self.components, &self.domain)
	}
}

/// Submits a call to the settlement contract (or a registry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeAction {
	pub transaction: Transaction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
	Approval(ApprovalAction),
	Create(CreateOrderAction),
	Exchange(ExchangeAction),
}

impl Action {
	pub fn kind(&self) -> &'static str {
		match self {
			Action::Approval(_) => "approval",
			Action::Create(_) => "create",
			Action::Exchange(_) => "exchange",
		}
	}

	/// Transaction submitted by this action; creation only signs.
	pub fn transaction(&self) -> Option<&Transaction> {
		match self {
			Action::Approval(approval) => Some(&approval.transaction),
			Action::Exchange(exchange) => Some(&exchange.transaction),
			Action::Create(_) => None,
		}
	}
}

/// Result of executing one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
	Approved(TransactionReceipt),
	Created(OrderWithCounter),
	Exchanged(TransactionReceipt),
}

/// Carries out actions: submits their transactions or signs their orders.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
	async fn execute(&self, action: &Action) -> Result<ActionOutcome, SeaportError>;
}

/// Actions in submission order with a cursor over what has run.
///
/// A sequence is consumed as it executes and cannot be copied to run again:
///
/// ```compile_fail
/// fn replay(sequence: &seaport_core::ActionSequence) -> seaport_core::ActionSequence {
/// 	sequence.clone()
/// }
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ActionSequence {
	pending: VecDeque<Action>,
	executed: usize,
}

impl ActionSequence {
	pub fn new(actions: Vec<Action>) -> Self {
		Self {
			pending: actions.into(),
			executed: 0,
		}
	}

	/// Total number of actions, executed or not.
	pub fn len(&self) -> usize {
		self.executed + self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn remaining(&self) -> usize {
		self.pending.len()
	}

	pub fn executed(&self) -> usize {
		self.executed
	}

	pub fn peek(&self) -> Option<&Action> {
		self.pending.front()
	}

	/// Actions not yet executed.
	pub fn iter(&self) -> impl Iterator<Item = &Action> {
		self.pending.iter()
	}
}

impl Iterator for ActionSequence {
	type Item = Action;

	fn next(&mut self) -> Option<Action> {
		let action = self.pending.pop_front()?;
		self.executed += 1;
		Some(action)
	}
}

/// Where a use case stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCaseState {
	Pending,
	/// Number of approvals already granted.
	Approving(usize),
	Creating,
	Exchanging,
	Done,
}

/// Terminal result type of a use case.
pub trait UseCase: Send + Sync {
	type Output: Send;

	fn finish(outcome: ActionOutcome) -> Result<Self::Output, SeaportError>;
}

/// Use case ending in a signed order.
#[derive(Debug)]
pub struct CreateOrder;

/// Use case ending in a mined exchange transaction.
#[derive(Debug)]
pub struct Exchange;

impl UseCase for CreateOrder {
	type Output = OrderWithCounter;

	fn finish(outcome: ActionOutcome) -> Result<Self::Output, SeaportError> {
		match outcome {
			ActionOutcome::Created(order) => Ok(order),
			other => Err(SeaportError::UnexpectedAction(format!(
				"expected a created order, got {:?}",
				other
			))),
		}
	}
}

impl UseCase for Exchange {
	type Output = TransactionReceipt;

	fn finish(outcome: ActionOutcome) -> Result<Self::Output, SeaportError> {
		match outcome {
			ActionOutcome::Exchanged(receipt) => Ok(receipt),
			other => Err(SeaportError::UnexpectedAction(format!(
				"expected an exchange receipt, got {:?}",
				other
			))),
		}
	}
}

/// Approvals plus one terminal action, driven by the caller.
#[derive(Debug)]
pub struct OrderUseCase<K: UseCase> {
	actions: ActionSequence,
	approvals_granted: usize,
	warnings: Vec<OrderError>,
	_kind: PhantomData<K>,
}

impl<K: UseCase> OrderUseCase<K> {
	pub fn new(actions: Vec<Action>) -> Self {
		Self {
			actions: ActionSequence::new(actions),
			approvals_granted: 0,
			warnings: Vec::new(),
			_kind: PhantomData,
		}
	}

	/// Attaches problems found while planning that do not stop the plan.
	pub fn with_warnings(mut self, warnings: Vec<OrderError>) -> Self {
		for warning in &warnings {
			tracing::warn!(%warning, "Planned actions are expected to revert");
		}
		self.warnings.extend(warnings);
		self
	}

	/// Problems that will make the terminal action revert on chain, such as
	/// criteria proofs that do not verify.
	pub fn warnings(&self) -> &[OrderError] {
		&self.warnings
	}

	pub fn actions(&self) -> &ActionSequence {
		&self.actions
	}

	pub fn into_actions(self) -> ActionSequence {
		self.actions
	}

	pub fn next_action(&self) -> Option<&Action> {
		self.actions.peek()
	}

	pub fn state(&self) -> UseCaseState {
		match self.actions.peek() {
			None => UseCaseState::Done,
			Some(_) if self.actions.executed() == 0 => UseCaseState::Pending,
			Some(Action::Approval(_)) => UseCaseState::Approving(self.approvals_granted),
			Some(Action::Create(_)) => UseCaseState::Creating,
			Some(Action::Exchange(_)) => UseCaseState::Exchanging,
		}
	}

	/// Executes the next action. A failed action stays at the front of the
	/// sequence; `Ok(None)` means the sequence is exhausted.
	pub async fn execute_next<E>(&mut self, executor: &E) -> Result<Option<ActionOutcome>, SeaportError>
	where
		E: ActionExecutor + ?Sized,
	{
		let Some(action) = self.actions.peek() else {
			return Ok(None);
		};

		let step = self.actions.executed() + 1;
		tracing::info!(
			step,
			total = self.actions.len(),
			kind = action.kind(),
			"Executing action"
		);
		let outcome = executor.execute(action).await?;

		if matches!(outcome, ActionOutcome::Approved(_)) {
			self.approvals_granted += 1;
		}
		self.actions.next();
		Ok(Some(outcome))
	}

	/// Runs every remaining action in order and returns the terminal result.
	pub async fn execute_all_actions<E>(mut self, executor: &E) -> Result<K::Output, SeaportError>
	where
		E: ActionExecutor + ?Sized,
	{
		let mut last = None;
		while let Some(outcome) = self.execute_next(executor).await? {
			last = Some(outcome);
		}
		let outcome = last.ok_or_else(|| {
			SeaportError::UnexpectedAction("the use case has no actions left".into())
		})?;
		K::finish(outcome)
	}
}

impl OrderUseCase<Exchange> {
	/// Approvals followed by one exchange call.
	pub fn exchange(approvals: Vec<ApprovalAction>, transaction: Transaction) -> Self {
		let mut actions: Vec<Action> = approvals.into_iter().map(Action::Approval).collect();
		actions.push(Action::Exchange(ExchangeAction { transaction }));
		Self::new(actions)
	}
}
