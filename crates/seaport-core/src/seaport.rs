//! The Seaport client: configuration, chain access and action execution.
//!
//! Planning operations (`create_order`, `fulfill_order`, ...) live in their
//! own modules as further `impl Seaport` blocks; this module holds the state
//! they share.

use crate::actions::{Action, ActionExecutor, ActionOutcome};
use crate::approval::ApprovalPlanner;
use crate::balance::BalanceReader;
use crate::contract::{ContractInformation, SeaportContract};
use crate::SeaportError;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::Eip712Domain;
use async_trait::async_trait;
use seaport_account::implementations::local::create_account;
use seaport_account::{AccountError, AccountInterface, AccountService};
use seaport_config::SeaportConfig;
use seaport_delivery::implementations::evm::alloy::create_http_delivery;
use seaport_delivery::{DeliveryError, DeliveryInterface, DeliveryService};
use seaport_order::hash::{order_hash, seaport_domain};
use seaport_order::TimeBasedItemParams;
use seaport_types::{
	OrderComponents, OrderParameters, OrderStatus, OrderWithCounter, NO_CONDUIT,
};
use std::sync::Arc;

/// Client bound to one settlement contract deployment and one account.
pub struct Seaport {
	pub(crate) config: SeaportConfig,
	pub(crate) account: Arc<AccountService>,
	pub(crate) delivery: Arc<DeliveryService>,
	pub(crate) contract: SeaportContract,
	pub(crate) balances: BalanceReader,
	pub(crate) planner: ApprovalPlanner,
}

impl Seaport {
	pub fn new(config: SeaportConfig, account: AccountService, delivery: DeliveryService) -> Self {
		let chain_id = config.network.chain_id;
		let delivery = Arc::new(delivery);
		let contract = SeaportContract::new(config.contracts.seaport, chain_id, delivery.clone());
		let balances = BalanceReader::new(delivery.clone(), chain_id);
		let planner = ApprovalPlanner::new(config.approvals.strategy);

		tracing::info!(
			chain_id,
			seaport = %config.contracts.seaport,
			strategy = ?config.approvals.strategy,
			"Seaport client ready"
		);

		Self {
			config,
			account: Arc::new(account),
			delivery,
			contract,
			balances,
			planner,
		}
	}

	/// Builds a client with the local wallet and HTTP delivery backends.
	pub fn from_config(config: SeaportConfig) -> Result<Self, SeaportError> {
		SeaportBuilder::new(config)
			.with_account_factory(create_account)
			.with_delivery_factory(create_http_delivery)
			.build()
	}

	pub fn config(&self) -> &SeaportConfig {
		&self.config
	}

	pub fn contract(&self) -> &SeaportContract {
		&self.contract
	}

	pub fn chain_id(&self) -> u64 {
		self.config.network.chain_id
	}

	/// EIP-712 domain orders are signed under.
	pub fn domain(&self) -> Eip712Domain {
		seaport_domain(self.chain_id(), self.contract.address())
	}

	pub async fn account_address(&self) -> Result<Address, SeaportError> {
		Ok(self.account.get_address().await?)
	}

	/// Address that moves tokens for `conduit_key`: the settlement contract
	/// itself for the zero key, otherwise the configured conduit.
	pub fn conduit_operator(&self, conduit_key: B256) -> Result<Address, SeaportError> {
		if conduit_key == NO_CONDUIT {
			return Ok(self.contract.address());
		}
		self.config
			.contracts
			.conduits
			.get(&conduit_key)
			.copied()
			.ok_or_else(|| {
				SeaportError::Configuration(format!("No conduit configured for key {}", conduit_key))
			})
	}

	/// Legacy proxy of `owner`; `None` without a configured registry.
	pub async fn proxy_of(&self, owner: Address) -> Result<Option<Address>, SeaportError> {
		match self.config.contracts.proxy_registry {
			Some(registry) => self.contract.proxy_of(registry, owner).await,
			None => Ok(None),
		}
	}

	pub(crate) fn time_params(
		&self,
		parameters: &OrderParameters,
		now: u64,
		is_consideration_item: bool,
	) -> TimeBasedItemParams {
		TimeBasedItemParams {
			ascending_amount_timestamp_buffer: self.config.approvals.ascending_amount_timestamp_buffer,
			..TimeBasedItemParams::for_order(parameters, now, is_consideration_item)
		}
	}

	pub async fn get_order_status(&self, order_hash: B256) -> Result<OrderStatus, SeaportError> {
		self.contract.get_order_status(order_hash).await
	}

	pub async fn get_counter(&self, offerer: Address) -> Result<U256, SeaportError> {
		self.contract.get_counter(offerer).await
	}

	/// Order hash computed locally.
	pub fn get_order_hash(&self, components: &OrderComponents) -> B256 {
		order_hash(components)
	}

	/// Order hash as reported by the settlement contract.
	pub async fn contract_order_hash(&self, components: &OrderComponents) -> Result<B256, SeaportError> {
		self.contract.get_order_hash(components).await
	}

	pub async fn information(&self) -> Result<ContractInformation, SeaportError> {
		self.contract.information().await
	}

	/// Signs `components` with the configured account.
	pub async fn sign_order(&self, components: &OrderComponents) -> Result<Bytes, SeaportError> {
		Ok(self.account.sign_order(components, &self.domain()).await?)
	}
}

#[async_trait]
impl ActionExecutor for Seaport {
	async fn execute(&self, action: &Action) -> Result<ActionOutcome, SeaportError> {
		match action {
			Action::Approval(approval) => {
				tracing::info!(
					token = %approval.token,
					operator = %approval.operator,
					item_type = %approval.item_type,
					"Submitting approval"
				);
				let receipt = self.delivery.deliver(approval.transaction.clone()).await?;
				Ok(ActionOutcome::Approved(receipt))
			}
			Action::Create(create) => {
				let signature = self
					.account
					.sign_order(&create.components, &create.domain)
					.await?;
				tracing::info!(
					offerer = %create.components.offerer,
					order_hash = %order_hash(&create.components),
					"Order created"
				);
				Ok(ActionOutcome::Created(OrderWithCounter {
					parameters: create.components.clone(),
					signature,
				}))
			}
			Action::Exchange(exchange) => {
				tracing::info!(
					to = ?exchange.transaction.to,
					value = %exchange.transaction.value,
					"Submitting exchange"
				);
				let receipt = self.delivery.deliver(exchange.transaction.clone()).await?;
				Ok(ActionOutcome::Exchanged(receipt))
			}
		}
	}
}

type AccountFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> + Send>;
type DeliveryFactory =
	Box<dyn Fn(&toml::Value) -> Result<Box<dyn DeliveryInterface>, DeliveryError> + Send>;

/// Assembles a [`Seaport`] client from configuration and backend factories.
pub struct SeaportBuilder {
	config: SeaportConfig,
	account_factory: Option<AccountFactory>,
	delivery_factory: Option<DeliveryFactory>,
}

impl SeaportBuilder {
	pub fn new(config: SeaportConfig) -> Self {
		Self {
			config,
			account_factory: None,
			delivery_factory: None,
		}
	}

	pub fn with_account_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> + Send + 'static,
	{
		self.account_factory = Some(Box::new(factory));
		self
	}

	pub fn with_delivery_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<Box<dyn DeliveryInterface>, DeliveryError> + Send + 'static,
	{
		self.delivery_factory = Some(Box::new(factory));
		self
	}

	pub fn build(self) -> Result<Seaport, SeaportError> {
		let account = self
			.account_factory
			.ok_or_else(|| SeaportError::Configuration("Account factory not provided".into()))?(
			&self.config.account,
		)?;

		let delivery = self
			.delivery_factory
			.ok_or_else(|| SeaportError::Configuration("Delivery factory not provided".into()))?(
			&self.config.delivery,
		)
		.map_err(|e| SeaportError::Configuration(format!("Failed to create delivery: {}", e)))?;

		let confirmations = self.config.network.confirmations;
		Ok(Seaport::new(
			self.config,
			AccountService::new(account),
			DeliveryService::new(delivery, confirmations),
		))
	}
}
