//! Marketplace domain registry.
//!
//! Domains are registered under the first four bytes of their keccak256
//! hash, the same tag fulfillment calls append to their calldata.

use crate::actions::{Exchange, OrderUseCase};
use crate::{Seaport, SeaportError};
use alloy::primitives::{Address, FixedBytes, U256};
use seaport_order::hash::domain_tag;

impl Seaport {
	fn domain_registry(&self) -> Result<Address, SeaportError> {
		self.config
			.contracts
			.domain_registry
			.ok_or_else(|| SeaportError::Configuration("No domain registry configured".into()))
	}

	/// Registers `domain` so its tag can be resolved back to it.
	pub async fn set_domain(&self, domain: &str) -> Result<OrderUseCase<Exchange>, SeaportError> {
		let registry = self.domain_registry()?;
		let caller = self.account_address().await?;
		tracing::info!(domain, tag = %domain_tag(domain), "Planned domain registration");
		Ok(OrderUseCase::exchange(
			Vec::new(),
			self.contract.set_domain_tx(caller, registry, domain),
		))
	}

	pub async fn get_domain(&self, tag: FixedBytes<4>, index: U256) -> Result<String, SeaportError> {
		self.contract
			.get_domain(self.domain_registry()?, tag, index)
			.await
	}

	pub async fn get_domains(&self, tag: FixedBytes<4>) -> Result<Vec<String>, SeaportError> {
		self.contract.get_domains(self.domain_registry()?, tag).await
	}

	pub async fn get_number_of_domains(&self, tag: FixedBytes<4>) -> Result<U256, SeaportError> {
		self.contract
			.get_number_of_domains(self.domain_registry()?, tag)
			.await
	}
}
