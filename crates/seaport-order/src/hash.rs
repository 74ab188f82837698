//! EIP-712 hashing of order components and domain tags.

use alloy::primitives::{keccak256, Address, FixedBytes, B256};
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct};
use seaport_types::{abi, OrderComponents, SEAPORT_CONTRACT_NAME, SEAPORT_CONTRACT_VERSION};

/// Signing domain of a settlement contract deployment.
pub fn seaport_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
	eip712_domain! {
		name: SEAPORT_CONTRACT_NAME,
		version: SEAPORT_CONTRACT_VERSION,
		chain_id: chain_id,
		verifying_contract: verifying_contract,
	}
}

/// Struct hash of `components`; this is the order hash the contract
/// reports from `getOrderHash`.
pub fn order_hash(components: &OrderComponents) -> B256 {
	abi::OrderComponents::from(components).eip712_hash_struct()
}

/// Digest the offerer signs for `components` under `domain`.
pub fn order_signing_hash(components: &OrderComponents, domain: &Eip712Domain) -> B256 {
	abi::OrderComponents::from(components).eip712_signing_hash(domain)
}

/// Four-byte tag of a marketplace domain string.
pub fn domain_tag(domain: &str) -> FixedBytes<4> {
	let hash = keccak256(domain.as_bytes());
	FixedBytes::<4>::from_slice(&hash[..4])
}

/// Appends the domain tag to exchange calldata; empty domains append nothing.
pub fn tag_calldata(mut data: Vec<u8>, domain: Option<&str>) -> Vec<u8> {
	if let Some(domain) = domain.filter(|d| !d.is_empty()) {
		data.extend_from_slice(domain_tag(domain).as_slice());
	}
	data
}
