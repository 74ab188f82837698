//! Transaction delivery and chain reads for the Seaport client.
//!
//! The planner never talks to a node directly: it reads state through
//! `call`, `native_balance` and `latest_block_timestamp`, and submits the
//! transactions built by its actions through `submit`. Swapping the
//! [`DeliveryInterface`] implementation is how tests run against an
//! in-memory chain.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use seaport_types::{ConfigSchema, Transaction, TransactionHash, TransactionReceipt};
use thiserror::Error;

pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs when talking to the node fails.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a read-only call reverts or returns garbage.
	#[error("Call failed: {0}")]
	Call(String),
	/// Error that occurs when a mined transaction reverted.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// Error that occurs when the delivery configuration is rejected.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Trait defining the interface for transaction delivery providers.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Returns the configuration schema for this delivery implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Signs and broadcasts `tx`, returning its hash without waiting.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Waits until `hash` is mined with at least `confirmations` blocks on top.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Receipt of an already mined transaction.
	async fn get_receipt(&self, hash: &TransactionHash)
		-> Result<TransactionReceipt, DeliveryError>;

	/// Executes `tx` as a read-only call against the latest block.
	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError>;

	/// Native currency balance of `address`.
	async fn native_balance(&self, address: Address) -> Result<U256, DeliveryError>;

	/// Timestamp of the latest block, used to price time-based items.
	async fn latest_block_timestamp(&self) -> Result<u64, DeliveryError>;
}

/// Service that submits transactions and performs reads through one provider.
pub struct DeliveryService {
	provider: Box<dyn DeliveryInterface>,
	confirmations: u64,
}

impl DeliveryService {
	pub fn new(provider: Box<dyn DeliveryInterface>, confirmations: u64) -> Self {
		Self {
			provider,
			confirmations,
		}
	}

	/// Submits `tx` and waits for the configured confirmations.
	///
	/// A mined but reverted transaction is reported as
	/// [`DeliveryError::TransactionFailed`]; nothing is retried.
	pub async fn deliver(&self, tx: Transaction) -> Result<TransactionReceipt, DeliveryError> {
		let hash = self.provider.submit(tx).await?;
		let receipt = self
			.provider
			.wait_for_confirmation(&hash, self.confirmations)
			.await?;

		if !receipt.success {
			tracing::warn!(tx_hash = %hash.truncated(), "Transaction reverted");
			return Err(DeliveryError::TransactionFailed(format!(
				"transaction {} reverted",
				hash
			)));
		}

		tracing::info!(
			tx_hash = %hash.truncated(),
			block = receipt.block_number,
			"Transaction confirmed"
		);
		Ok(receipt)
	}

	pub async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.provider.get_receipt(hash).await
	}

	pub async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		self.provider.call(tx).await
	}

	pub async fn native_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider.native_balance(address).await
	}

	pub async fn latest_block_timestamp(&self) -> Result<u64, DeliveryError> {
		self.provider.latest_block_timestamp().await
	}
}
