//! Signing boundary for the Seaport client.
//!
//! Orders are signed as EIP-712 typed data: the service computes the digest
//! of the order components under the settlement contract's domain and hands
//! it to an [`AccountInterface`] implementation for signing.

use alloy::primitives::{Address, Bytes, B256};
use alloy::sol_types::Eip712Domain;
use async_trait::async_trait;
use seaport_order::hash::order_signing_hash;
use seaport_types::{ConfigSchema, OrderComponents, Signature};
use thiserror::Error;

pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing fails.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when the configured key cannot be used.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when the account configuration is rejected.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

/// Trait defining the interface for signing backends.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Returns the configuration schema for this account implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Address whose key signs.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a precomputed 32-byte digest without any prefix.
	async fn sign_hash(&self, hash: &B256) -> Result<Signature, AccountError>;

	/// Signs an arbitrary message with the EIP-191 personal-message prefix.
	async fn sign_message(&self, message: &[u8]) -> Result<Signature, AccountError>;
}

/// Service wrapping the configured signing backend.
pub struct AccountService {
	provider: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(provider: Box<dyn AccountInterface>) -> Self {
		Self { provider }
	}

	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.provider.address().await
	}

	/// Signs `components` as typed data under `domain`.
	pub async fn sign_order(
		&self,
		components: &OrderComponents,
		domain: &Eip712Domain,
	) -> Result<Bytes, AccountError> {
		let digest = order_signing_hash(components, domain);
		let signature = self.provider.sign_hash(&digest).await?;
		tracing::debug!(
			offerer = %components.offerer,
			digest = %digest,
			"Signed order"
		);
		Ok(signature.into())
	}

	pub async fn sign_message(&self, message: &[u8]) -> Result<Bytes, AccountError> {
		Ok(self.provider.sign_message(message).await?.into())
	}
}
