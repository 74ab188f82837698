//! Typed boundary to the settlement contract and the registries around it.
//!
//! Reads go through [`DeliveryService::call`] and are decoded here; writes
//! are only encoded into [`Transaction`]s and handed back to the caller, who
//! wraps them in actions.

use crate::SeaportError;
use alloy::primitives::{Address, Bytes, FixedBytes, B256, U256};
use alloy::sol_types::SolCall;
use seaport_delivery::DeliveryService;
use seaport_order::hash::tag_calldata;
use seaport_order::OrderError;
use seaport_types::abi::{self, IDomainRegistry, IProxyRegistry, ISeaport};
use seaport_types::{
	AdvancedOrder, AvailableFulfillments, CriteriaResolver, Fulfillment, Order, OrderComponents,
	OrderStatus, Transaction,
};
use std::sync::Arc;

/// Values reported by `information()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInformation {
	pub version: String,
	pub domain_separator: B256,
	pub conduit_controller: Address,
}

/// Builds a read-only call with no sender.
pub(crate) fn view_call(to: Address, data: Vec<u8>, chain_id: u64) -> Transaction {
	Transaction {
		from: None,
		..Transaction::call(Address::ZERO, to, data, chain_id)
	}
}

pub(crate) fn decode_returns<C: SolCall>(data: &Bytes) -> Result<C::Return, SeaportError> {
	C::abi_decode_returns(data).map_err(|e| {
		SeaportError::Decode(format!("Failed to decode {} result: {}", C::SIGNATURE, e))
	})
}

fn advanced_orders(orders: &[AdvancedOrder]) -> Result<Vec<abi::AdvancedOrder>, SeaportError> {
	orders
		.iter()
		.map(|order| abi::AdvancedOrder::try_from(order).map_err(OrderError::Validation))
		.collect::<Result<Vec<_>, OrderError>>()
		.map_err(SeaportError::from)
}

/// Settlement contract deployment on one chain.
#[derive(Clone)]
pub struct SeaportContract {
	address: Address,
	chain_id: u64,
	delivery: Arc<DeliveryService>,
}

impl SeaportContract {
	pub fn new(address: Address, chain_id: u64, delivery: Arc<DeliveryService>) -> Self {
		Self {
			address,
			chain_id,
			delivery,
		}
	}

	pub fn address(&self) -> Address {
		self.address
	}

	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn read<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, SeaportError> {
		let tx = view_call(to, call.abi_encode(), self.chain_id);
		let data = self.delivery.call(&tx).await?;
		decode_returns::<C>(&data)
	}

	fn write(&self, from: Address, data: Vec<u8>, value: U256, domain: Option<&str>) -> Transaction {
		Transaction::call(from, self.address, tag_calldata(data, domain), self.chain_id)
			.with_value(value)
	}

	pub async fn get_order_status(&self, order_hash: B256) -> Result<OrderStatus, SeaportError> {
		let status = self
			.read(self.address, ISeaport::getOrderStatusCall { orderHash: order_hash })
			.await?;
		Ok(status.into())
	}

	pub async fn get_counter(&self, offerer: Address) -> Result<U256, SeaportError> {
		self.read(self.address, ISeaport::getCounterCall { offerer })
			.await
	}

	/// Order hash as computed by the contract itself.
	pub async fn get_order_hash(&self, components: &OrderComponents) -> Result<B256, SeaportError> {
		self.read(
			self.address,
			ISeaport::getOrderHashCall {
				order: components.into(),
			},
		)
		.await
	}

	pub async fn information(&self) -> Result<ContractInformation, SeaportError> {
		let info = self.read(self.address, ISeaport::informationCall {}).await?;
		Ok(ContractInformation {
			version: info.version,
			domain_separator: info.domainSeparator,
			conduit_controller: info.conduitController,
		})
	}

	/// Proxy registered for `owner` in a legacy proxy registry, if any.
	pub async fn proxy_of(
		&self,
		registry: Address,
		owner: Address,
	) -> Result<Option<Address>, SeaportError> {
		let proxy = self
			.read(registry, IProxyRegistry::proxiesCall { owner })
			.await?;
		Ok((!proxy.is_zero()).then_some(proxy))
	}

	pub async fn get_domain(
		&self,
		registry: Address,
		tag: FixedBytes<4>,
		index: U256,
	) -> Result<String, SeaportError> {
		self.read(registry, IDomainRegistry::getDomainCall { tag, index })
			.await
	}

	pub async fn get_domains(
		&self,
		registry: Address,
		tag: FixedBytes<4>,
	) -> Result<Vec<String>, SeaportError> {
		self.read(registry, IDomainRegistry::getDomainsCall { tag })
			.await
	}

	pub async fn get_number_of_domains(
		&self,
		registry: Address,
		tag: FixedBytes<4>,
	) -> Result<U256, SeaportError> {
		self.read(registry, IDomainRegistry::getNumberOfDomainsCall { tag })
			.await
	}

	pub fn set_domain_tx(&self, from: Address, registry: Address, domain: &str) -> Transaction {
		let data = IDomainRegistry::setDomainCall {
			domain: domain.to_string(),
		}
		.abi_encode();
		Transaction::call(from, registry, data, self.chain_id)
	}

	pub fn fulfill_basic_order_tx(
		&self,
		from: Address,
		parameters: abi::BasicOrderParameters,
		value: U256,
		domain: Option<&str>,
	) -> Transaction {
		let data = ISeaport::fulfillBasicOrderCall { parameters }.abi_encode();
		self.write(from, data, value, domain)
	}

	pub fn fulfill_order_tx(
		&self,
		from: Address,
		order: &Order,
		fulfiller_conduit_key: B256,
		value: U256,
		domain: Option<&str>,
	) -> Transaction {
		let data = ISeaport::fulfillOrderCall {
			order: order.into(),
			fulfillerConduitKey: fulfiller_conduit_key,
		}
		.abi_encode();
		self.write(from, data, value, domain)
	}

	#[allow(clippy::too_many_arguments)]
	pub fn fulfill_advanced_order_tx(
		&self,
		from: Address,
		order: &AdvancedOrder,
		resolvers: &[CriteriaResolver],
		fulfiller_conduit_key: B256,
		recipient: Address,
		value: U256,
		domain: Option<&str>,
	) -> Result<Transaction, SeaportError> {
		let data = ISeaport::fulfillAdvancedOrderCall {
			advancedOrder: abi::AdvancedOrder::try_from(order).map_err(OrderError::Validation)?,
			criteriaResolvers: resolvers.iter().map(Into::into).collect(),
			fulfillerConduitKey: fulfiller_conduit_key,
			recipient,
		}
		.abi_encode();
		Ok(self.write(from, data, value, domain))
	}

	#[allow(clippy::too_many_arguments)]
	pub fn fulfill_available_advanced_orders_tx(
		&self,
		from: Address,
		orders: &[AdvancedOrder],
		resolvers: &[CriteriaResolver],
		fulfillments: &AvailableFulfillments,
		fulfiller_conduit_key: B256,
		recipient: Address,
		maximum_fulfilled: U256,
		value: U256,
		domain: Option<&str>,
	) -> Result<Transaction, SeaportError> {
		let data = ISeaport::fulfillAvailableAdvancedOrdersCall {
			advancedOrders: advanced_orders(orders)?,
			criteriaResolvers: resolvers.iter().map(Into::into).collect(),
			offerFulfillments: abi::component_groups(&fulfillments.offer_fulfillments),
			considerationFulfillments: abi::component_groups(
				&fulfillments.consideration_fulfillments,
			),
			fulfillerConduitKey: fulfiller_conduit_key,
			recipient,
			maximumFulfilled: maximum_fulfilled,
		}
		.abi_encode();
		Ok(self.write(from, data, value, domain))
	}

	pub fn match_orders_tx(
		&self,
		from: Address,
		orders: &[Order],
		fulfillments: &[Fulfillment],
		value: U256,
		domain: Option<&str>,
	) -> Transaction {
		let data = ISeaport::matchOrdersCall {
			orders: orders.iter().map(Into::into).collect(),
			fulfillments: fulfillments.iter().map(Into::into).collect(),
		}
		.abi_encode();
		self.write(from, data, value, domain)
	}

	pub fn match_advanced_orders_tx(
		&self,
		from: Address,
		orders: &[AdvancedOrder],
		resolvers: &[CriteriaResolver],
		fulfillments: &[Fulfillment],
		value: U256,
		domain: Option<&str>,
	) -> Result<Transaction, SeaportError> {
		let data = ISeaport::matchAdvancedOrdersCall {
			orders: advanced_orders(orders)?,
			criteriaResolvers: resolvers.iter().map(Into::into).collect(),
			fulfillments: fulfillments.iter().map(Into::into).collect(),
		}
		.abi_encode();
		Ok(self.write(from, data, value, domain))
	}

	pub fn cancel_tx(&self, from: Address, orders: &[OrderComponents]) -> Transaction {
		let data = ISeaport::cancelCall {
			orders: orders.iter().map(Into::into).collect(),
		}
		.abi_encode();
		self.write(from, data, U256::ZERO, None)
	}

	pub fn validate_tx(&self, from: Address, orders: &[Order]) -> Transaction {
		let data = ISeaport::validateCall {
			orders: orders.iter().map(Into::into).collect(),
		}
		.abi_encode();
		self.write(from, data, U256::ZERO, None)
	}

	pub fn increment_counter_tx(&self, from: Address) -> Transaction {
		let data = ISeaport::incrementCounterCall {}.abi_encode();
		self.write(from, data, U256::ZERO, None)
	}
}
