//! Alloy-based EVM delivery.
//!
//! Transactions are signed by the provider's wallet filler; reads go through
//! the same HTTP provider.

use crate::{DeliveryError, DeliveryInterface};
use alloy::eips::BlockNumberOrTag;
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use seaport_types::{
	ConfigSchema, Field, FieldType, Schema, Transaction, TransactionHash, TransactionReceipt,
	ValidationError,
};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Alloy-based EVM delivery implementation.
pub struct AlloyDelivery {
	provider: DynProvider,
	poll_interval: Duration,
}

impl AlloyDelivery {
	/// Connects to `rpc_url` with a wallet signing for `chain_id`.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		signer: PrivateKeySigner,
		poll_interval: Duration,
	) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL: {}", e)))?;

		let wallet = EthereumWallet::from(signer.with_chain_id(Some(chain_id)));
		let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();

		Ok(Self {
			provider,
			poll_interval,
		})
	}

	async fn receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<Option<TransactionReceipt>, DeliveryError> {
		let receipt = self
			.provider
			.get_transaction_receipt(hash.0)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?;

		Ok(receipt.map(|receipt| TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash),
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
		}))
	}
}

fn validate_private_key(value: &toml::Value) -> Result<(), String> {
	let key = value.as_str().unwrap_or_default();
	let key_without_prefix = key.strip_prefix("0x").unwrap_or(key);

	if key_without_prefix.len() != 64 {
		return Err("Private key must be 64 hex characters (32 bytes)".to_string());
	}
	if hex::decode(key_without_prefix).is_err() {
		return Err("Private key must be valid hexadecimal".to_string());
	}
	Ok(())
}

/// Configuration schema for Alloy delivery provider.
pub struct AlloyDeliverySchema;

impl ConfigSchema for AlloyDeliverySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("rpc_url", FieldType::String).with_validator(|value| {
					let url = value.as_str().unwrap_or_default();
					if url.starts_with("http://") || url.starts_with("https://") {
						Ok(())
					} else {
						Err("RPC URL must start with http:// or https://".to_string())
					}
				}),
				Field::new("private_key", FieldType::String).with_validator(validate_private_key),
				Field::new(
					"chain_id",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
			],
			vec![Field::new(
				"poll_interval_secs",
				FieldType::Integer {
					min: Some(1),
					max: Some(60),
				},
			)],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyDeliverySchema)
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		let request: TransactionRequest = tx.into();

		let pending_tx =
			self.provider.send_transaction(request).await.map_err(|e| {
				DeliveryError::Network(format!("Failed to send transaction: {}", e))
			})?;

		let hash = TransactionHash(*pending_tx.tx_hash());
		tracing::info!(tx_hash = %hash.truncated(), "Submitted transaction");

		Ok(hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		tracing::info!(
			tx_hash = %hash.truncated(),
			"Waiting for {} confirmations",
			confirmations
		);

		loop {
			let Some(receipt) = self.receipt(hash).await? else {
				tokio::time::sleep(self.poll_interval).await;
				continue;
			};

			let current_block = self.provider.get_block_number().await.map_err(|e| {
				DeliveryError::Network(format!("Failed to get block number: {}", e))
			})?;
			let current_confirmations = current_block.saturating_sub(receipt.block_number);

			if current_confirmations >= confirmations {
				return Ok(receipt);
			}

			tracing::debug!(
				"Waiting for {} more confirmations...",
				confirmations.saturating_sub(current_confirmations)
			);
			tokio::time::sleep(self.poll_interval).await;
		}
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.receipt(hash)
			.await?
			.ok_or_else(|| DeliveryError::Network("Transaction not found".to_string()))
	}

	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		let request: TransactionRequest = tx.clone().into();
		self.provider
			.call(request)
			.await
			.map_err(|e| DeliveryError::Call(e.to_string()))
	}

	async fn native_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get balance: {}", e)))
	}

	async fn latest_block_timestamp(&self) -> Result<u64, DeliveryError> {
		let block = self
			.provider
			.get_block_by_number(BlockNumberOrTag::Latest)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get block: {}", e)))?
			.ok_or_else(|| DeliveryError::Network("Latest block not found".to_string()))?;

		Ok(block.header.timestamp)
	}
}

/// Factory function to create an HTTP-based delivery provider from configuration.
///
/// Required configuration parameters:
/// - `rpc_url`: The HTTP RPC endpoint URL
/// - `chain_id`: The blockchain network chain ID
/// - `private_key`: The private key for transaction signing
pub fn create_http_delivery(
	config: &toml::Value,
) -> Result<Box<dyn DeliveryInterface>, DeliveryError> {
	AlloyDeliverySchema
		.validate(config)
		.map_err(|e| DeliveryError::InvalidConfig(e.to_string()))?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| DeliveryError::InvalidConfig("rpc_url is required".into()))?;
	let chain_id = config
		.get("chain_id")
		.and_then(|v| v.as_integer())
		.ok_or_else(|| DeliveryError::InvalidConfig("chain_id is required".into()))? as u64;
	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.ok_or_else(|| DeliveryError::InvalidConfig("private_key is required".into()))?;
	let poll_interval = config
		.get("poll_interval_secs")
		.and_then(|v| v.as_integer())
		.map(|secs| secs as u64)
		.unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

	let signer: PrivateKeySigner = private_key
		.parse()
		.map_err(|e| DeliveryError::InvalidConfig(format!("Invalid private key: {}", e)))?;

	Ok(Box::new(AlloyDelivery::new(
		rpc_url,
		chain_id,
		signer,
		Duration::from_secs(poll_interval),
	)?))
}
