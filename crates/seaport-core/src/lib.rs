//! Seaport order-fulfillment planning client.
//!
//! [`Seaport`] reads chain state in batches, validates balances, plans the
//! approvals an account is missing and hands back an [`OrderUseCase`]: an
//! ordered list of approval actions followed by one action that signs an
//! order or submits an exchange call.

pub mod actions;
pub mod approval;
pub mod balance;
pub mod contract;
pub mod create;
pub mod error;
pub mod fulfill;
pub mod management;
pub mod registry;
pub mod seaport;

pub use actions::{
	Action, ActionExecutor, ActionOutcome, ActionSequence, CreateOrder, CreateOrderAction, Exchange,
	ExchangeAction, OrderUseCase, UseCase, UseCaseState,
};
pub use approval::{ApprovalAction, ApprovalPlan, ApprovalPlanner, Operators};
pub use balance::{BalanceReader, BalanceSnapshot, ItemRequirement};
pub use contract::{ContractInformation, SeaportContract};
pub use create::{ConsiderationInputItem, CreateInputItem, CreateOrderInput};
pub use error::SeaportError;
pub use fulfill::{FulfillOptions, MatchOrdersInput, OrderDetails};
pub use seaport::{Seaport, SeaportBuilder};
