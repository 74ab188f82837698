//! Protocol constants shared across the workspace.

use alloy::primitives::{Address, B256, U256};

/// EIP-712 domain name of the settlement contract.
pub const SEAPORT_CONTRACT_NAME: &str = "Seaport";

/// EIP-712 domain version of the settlement contract.
pub const SEAPORT_CONTRACT_VERSION: &str = "1.1";

/// Canonical Seaport 1.1 deployment address (identical on every supported chain).
pub const CROSS_CHAIN_SEAPORT_ADDRESS: Address =
	alloy::primitives::address!("0x00000000006c3852cbef3e08e8df289169ede581");

/// Conduit key that routes transfers directly through the settlement contract.
pub const NO_CONDUIT: B256 = B256::ZERO;

/// Basis points denominator used for fees.
pub const ONE_HUNDRED_PERCENT_BP: u64 = 10_000;

/// Seconds added to the block timestamp when pricing ascending-amount items,
/// so that the transaction still covers the price once it is mined.
pub const DEFAULT_ASCENDING_AMOUNT_TIMESTAMP_BUFFER: u64 = 300;

/// Maximum allowance granted to an operator for fungible tokens.
pub const MAX_INT: U256 = U256::MAX;
