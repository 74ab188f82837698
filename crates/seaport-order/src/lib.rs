//! Order planning primitives for the Seaport client.
//!
//! Everything in this crate is pure: time-interpolated amounts, criteria
//! resolution, basic-path classification, EIP-712 hashing, fee construction,
//! partial-fill scaling and the multi-order matcher. Nothing here touches the
//! network; the core crate feeds these functions with freshly read chain state.

use thiserror::Error;

pub mod amount;
pub mod basic;
pub mod criteria;
pub mod fees;
pub mod hash;
pub mod matcher;
pub mod partial;

pub use amount::{current_amount, TimeBasedItemParams};
pub use basic::{
	ensure_consideration, is_basic_eligible, should_use_basic_fulfill, BasicOrderRouteType,
};
pub use criteria::{MerkleTree, OrderCriteria};
pub use matcher::{
	fulfill_available_fulfillments, match_fulfillments, private_listing_counter_order,
};

/// Errors raised while planning an order before any transaction is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
	/// Error that occurs when an order or fulfillment request is malformed.
	#[error("Validation failed: {0}")]
	Validation(String),
	/// Error that occurs when a criteria identifier does not verify against its root.
	#[error("Invalid criteria proof for identifier {0}")]
	InvalidProof(String),
	/// Error that occurs when no offer item can pay a consideration item.
	#[error("Unmatched consideration item {item_index} of order {order_index}")]
	UnmatchedConsiderationItem {
		order_index: usize,
		item_index: usize,
	},
	/// Error that occurs when an order without on-chain validation carries no signature.
	#[error("Order {order_index} is missing a signature")]
	MissingSignature { order_index: usize },
	/// Error that occurs when an account cannot cover the items it must transfer.
	#[error("Insufficient balance: {0}")]
	InsufficientBalance(String),
}
