//! Account-related types: signatures and unsigned transactions.
//!
//! Transactions built by the planner are plain data; the delivery layer turns
//! them into provider requests and submits them.

use alloy::primitives::{Address, Bytes, Signature as AlloySignature, TxKind, U256};
use alloy::rpc::types::{TransactionInput, TransactionRequest};

/// Cryptographic signature representation.
///
/// Stores signatures as raw bytes in the standard Ethereum format (r, s, v).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(pub Vec<u8>);

impl From<AlloySignature> for Signature {
	fn from(sig: AlloySignature) -> Self {
		let mut bytes = Vec::with_capacity(65);
		bytes.extend_from_slice(&sig.r().to_be_bytes::<32>());
		bytes.extend_from_slice(&sig.s().to_be_bytes::<32>());
		let v = if sig.v() { 28 } else { 27 };
		bytes.push(v);
		Signature(bytes)
	}
}

impl From<Signature> for Bytes {
	fn from(sig: Signature) -> Self {
		Bytes::from(sig.0)
	}
}

/// Unsigned transaction produced by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	/// Account the transaction is sent from.
	pub from: Option<Address>,
	/// Recipient address (None for contract creation).
	pub to: Option<Address>,
	/// Transaction data/calldata.
	pub data: Vec<u8>,
	/// Value to transfer in native currency.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	/// Transaction nonce (optional, can be filled by provider).
	pub nonce: Option<u64>,
	/// Gas limit for transaction execution.
	pub gas_limit: Option<u64>,
	/// Maximum fee per gas (EIP-1559).
	pub max_fee_per_gas: Option<u128>,
	/// Maximum priority fee per gas (EIP-1559).
	pub max_priority_fee_per_gas: Option<u128>,
}

impl Transaction {
	/// Contract call with no value attached.
	pub fn call(from: Address, to: Address, data: Vec<u8>, chain_id: u64) -> Self {
		Transaction {
			from: Some(from),
			to: Some(to),
			data,
			value: U256::ZERO,
			chain_id,
			nonce: None,
			gas_limit: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		}
	}

	pub fn with_value(mut self, value: U256) -> Self {
		self.value = value;
		self
	}

	/// 4-byte function selector of the calldata, if any.
	pub fn selector(&self) -> Option<[u8; 4]> {
		self.data.get(..4).and_then(|s| s.try_into().ok())
	}
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		TransactionRequest {
			from: tx.from,
			chain_id: Some(tx.chain_id),
			value: Some(tx.value),
			to: Some(tx.to.map(TxKind::Call).unwrap_or(TxKind::Create)),
			nonce: tx.nonce,
			gas: tx.gas_limit,
			max_fee_per_gas: tx.max_fee_per_gas,
			max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
			input: TransactionInput::new(Bytes::from(tx.data)),
			..Default::default()
		}
	}
}
