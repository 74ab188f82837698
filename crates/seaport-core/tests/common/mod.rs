//! In-memory chain for exercising the client end to end.
//!
//! `MockChain` answers the read calls the client makes (token balances and
//! approvals, counters, order statuses, proxies, domains) and applies the
//! approval, domain and counter transactions it is sent. Batch fulfillments
//! move the offered ERC721s to their recipient; other exchange calls are only
//! recorded.

#![allow(dead_code)]

use alloy::primitives::{keccak256, Address, Bytes, FixedBytes, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use seaport_account::implementations::local::LocalWallet;
use seaport_account::AccountService;
use seaport_config::{ConfigLoader, SeaportConfig};
use seaport_core::Seaport;
use seaport_delivery::{DeliveryError, DeliveryInterface, DeliveryService};
use seaport_order::hash::domain_tag;
use seaport_types::abi::{IDomainRegistry, IERC1155, IERC20, IERC721, IProxyRegistry, ISeaport};
use seaport_types::{
	ConfigSchema, ConsiderationItem, ItemType, OfferItem, Order, OrderParameters, OrderStatus,
	OrderType, Transaction, TransactionHash, TransactionReceipt, ValidationError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const SEAPORT: Address = Address::new([0x5e; 20]);
pub const PROXY_REGISTRY: Address = Address::new([0xa1; 20]);
pub const DOMAIN_REGISTRY: Address = Address::new([0xd0; 20]);
pub const CONDUIT: Address = Address::new([0xc0; 20]);
pub const CONDUIT_KEY: B256 = B256::new([0xcc; 32]);

pub const ERC20: Address = Address::new([0x20; 20]);
pub const ERC721: Address = Address::new([0x72; 20]);
pub const ERC1155: Address = Address::new([0x11; 20]);

pub const OFFERER: Address = Address::new([0x0f; 20]);
pub const FEE_RECIPIENT: Address = Address::new([0xfe; 20]);

/// First well-known development key.
pub const WALLET_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const NOW: u64 = 1_700_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	Erc20,
	Erc721,
	Erc1155,
}

#[derive(Debug, Default)]
pub struct ChainState {
	pub timestamp: u64,
	pub native: HashMap<Address, U256>,
	pub kinds: HashMap<Address, TokenKind>,
	pub erc20: HashMap<(Address, Address), U256>,
	pub allowances: HashMap<(Address, Address, Address), U256>,
	pub owners: HashMap<(Address, U256), Address>,
	pub erc1155: HashMap<(Address, Address, U256), U256>,
	pub operators: HashMap<(Address, Address, Address), bool>,
	pub counters: HashMap<Address, U256>,
	pub statuses: HashMap<B256, OrderStatus>,
	pub proxies: HashMap<Address, Address>,
	pub domains: HashMap<FixedBytes<4>, Vec<String>>,
	pub submitted: Vec<Transaction>,
	pub receipts: HashMap<B256, bool>,
	pub revert_selectors: Vec<[u8; 4]>,
}

#[derive(Debug, Default)]
pub struct MockChain {
	pub state: Mutex<ChainState>,
}

impl MockChain {
	pub fn new() -> Arc<Self> {
		let chain = Self::default();
		{
			let mut state = chain.state.lock().unwrap();
			state.timestamp = NOW;
			state.kinds.insert(ERC20, TokenKind::Erc20);
			state.kinds.insert(ERC721, TokenKind::Erc721);
			state.kinds.insert(ERC1155, TokenKind::Erc1155);
		}
		Arc::new(chain)
	}

	pub fn set_native(&self, owner: Address, amount: u64) {
		self.state.lock().unwrap().native.insert(owner, U256::from(amount));
	}

	pub fn mint_erc20(&self, owner: Address, amount: u64) {
		self.state
			.lock()
			.unwrap()
			.erc20
			.insert((ERC20, owner), U256::from(amount));
	}

	pub fn mint_erc721(&self, owner: Address, id: u64) {
		self.state
			.lock()
			.unwrap()
			.owners
			.insert((ERC721, U256::from(id)), owner);
	}

	pub fn mint_erc1155(&self, owner: Address, id: u64, amount: u64) {
		self.state
			.lock()
			.unwrap()
			.erc1155
			.insert((ERC1155, owner, U256::from(id)), U256::from(amount));
	}

	pub fn approve_all(&self, token: Address, owner: Address, operator: Address) {
		let mut state = self.state.lock().unwrap();
		match state.kinds.get(&token) {
			Some(TokenKind::Erc20) => {
				state.allowances.insert((token, owner, operator), U256::MAX);
			}
			_ => {
				state.operators.insert((token, owner, operator), true);
			}
		}
	}

	pub fn set_status(&self, hash: B256, status: OrderStatus) {
		self.state.lock().unwrap().statuses.insert(hash, status);
	}

	pub fn set_proxy(&self, owner: Address, proxy: Address) {
		self.state.lock().unwrap().proxies.insert(owner, proxy);
	}

	pub fn set_timestamp(&self, timestamp: u64) {
		self.state.lock().unwrap().timestamp = timestamp;
	}

	pub fn revert_on(&self, selector: [u8; 4]) {
		self.state.lock().unwrap().revert_selectors.push(selector);
	}

	pub fn owner_of(&self, id: u64) -> Option<Address> {
		self.state
			.lock()
			.unwrap()
			.owners
			.get(&(ERC721, U256::from(id)))
			.copied()
	}

	pub fn submitted(&self) -> Vec<Transaction> {
		self.state.lock().unwrap().submitted.clone()
	}
}

fn decode_error(e: alloy::sol_types::Error) -> DeliveryError {
	DeliveryError::Call(e.to_string())
}

fn unknown(to: Address, selector: [u8; 4]) -> DeliveryError {
	DeliveryError::Call(format!(
		"unexpected call 0x{} to {}",
		alloy::hex::encode(selector),
		to
	))
}

fn read(state: &ChainState, to: Address, data: &[u8]) -> Result<Vec<u8>, DeliveryError> {
	let selector: [u8; 4] = data
		.get(..4)
		.and_then(|s| s.try_into().ok())
		.ok_or_else(|| DeliveryError::Call("missing selector".into()))?;

	if to == SEAPORT {
		if selector == ISeaport::getCounterCall::SELECTOR {
			let call = ISeaport::getCounterCall::abi_decode(data).map_err(decode_error)?;
			let counter = state.counters.get(&call.offerer).copied().unwrap_or_default();
			return Ok((counter,).abi_encode_params());
		}
		if selector == ISeaport::getOrderStatusCall::SELECTOR {
			let call = ISeaport::getOrderStatusCall::abi_decode(data).map_err(decode_error)?;
			let status = state.statuses.get(&call.orderHash).copied().unwrap_or_default();
			return Ok((
				status.is_validated,
				status.is_cancelled,
				status.total_filled,
				status.total_size,
			)
				.abi_encode_params());
		}
		if selector == ISeaport::informationCall::SELECTOR {
			return Ok(("1.1".to_string(), B256::repeat_byte(0xdd), CONDUIT).abi_encode_params());
		}
		return Err(unknown(to, selector));
	}

	if to == PROXY_REGISTRY && selector == IProxyRegistry::proxiesCall::SELECTOR {
		let call = IProxyRegistry::proxiesCall::abi_decode(data).map_err(decode_error)?;
		let proxy = state.proxies.get(&call.owner).copied().unwrap_or_default();
		return Ok((proxy,).abi_encode_params());
	}

	if to == DOMAIN_REGISTRY {
		if selector == IDomainRegistry::getDomainsCall::SELECTOR {
			let call = IDomainRegistry::getDomainsCall::abi_decode(data).map_err(decode_error)?;
			let domains = state.domains.get(&call.tag).cloned().unwrap_or_default();
			return Ok((domains,).abi_encode_params());
		}
		if selector == IDomainRegistry::getNumberOfDomainsCall::SELECTOR {
			let call =
				IDomainRegistry::getNumberOfDomainsCall::abi_decode(data).map_err(decode_error)?;
			let count = state.domains.get(&call.tag).map_or(0, Vec::len);
			return Ok((U256::from(count),).abi_encode_params());
		}
		if selector == IDomainRegistry::getDomainCall::SELECTOR {
			let call = IDomainRegistry::getDomainCall::abi_decode(data).map_err(decode_error)?;
			let index = usize::try_from(call.index).unwrap_or(usize::MAX);
			let domain = state
				.domains
				.get(&call.tag)
				.and_then(|domains| domains.get(index))
				.cloned()
				.ok_or_else(|| DeliveryError::Call("domain index out of bounds".into()))?;
			return Ok((domain,).abi_encode_params());
		}
		return Err(unknown(to, selector));
	}

	match state.kinds.get(&to) {
		Some(TokenKind::Erc20) => {
			if selector == IERC20::balanceOfCall::SELECTOR {
				let call = IERC20::balanceOfCall::abi_decode(data).map_err(decode_error)?;
				let balance = state.erc20.get(&(to, call.account)).copied().unwrap_or_default();
				return Ok((balance,).abi_encode_params());
			}
			if selector == IERC20::allowanceCall::SELECTOR {
				let call = IERC20::allowanceCall::abi_decode(data).map_err(decode_error)?;
				let allowance = state
					.allowances
					.get(&(to, call.owner, call.spender))
					.copied()
					.unwrap_or_default();
				return Ok((allowance,).abi_encode_params());
			}
		}
		Some(TokenKind::Erc721) => {
			if selector == IERC721::ownerOfCall::SELECTOR {
				let call = IERC721::ownerOfCall::abi_decode(data).map_err(decode_error)?;
				let owner = state.owners.get(&(to, call.tokenId)).copied().unwrap_or_default();
				return Ok((owner,).abi_encode_params());
			}
			if selector == IERC721::balanceOfCall::SELECTOR {
				let call = IERC721::balanceOfCall::abi_decode(data).map_err(decode_error)?;
				let count = state
					.owners
					.iter()
					.filter(|((token, _), owner)| *token == to && **owner == call.owner)
					.count();
				return Ok((U256::from(count),).abi_encode_params());
			}
			if selector == IERC721::isApprovedForAllCall::SELECTOR {
				let call = IERC721::isApprovedForAllCall::abi_decode(data).map_err(decode_error)?;
				let approved = state
					.operators
					.get(&(to, call.owner, call.operator))
					.copied()
					.unwrap_or(false);
				return Ok((approved,).abi_encode_params());
			}
		}
		Some(TokenKind::Erc1155) => {
			if selector == IERC1155::balanceOfCall::SELECTOR {
				let call = IERC1155::balanceOfCall::abi_decode(data).map_err(decode_error)?;
				let balance = state
					.erc1155
					.get(&(to, call.account, call.id))
					.copied()
					.unwrap_or_default();
				return Ok((balance,).abi_encode_params());
			}
			if selector == IERC1155::isApprovedForAllCall::SELECTOR {
				let call = IERC1155::isApprovedForAllCall::abi_decode(data).map_err(decode_error)?;
				let approved = state
					.operators
					.get(&(to, call.account, call.operator))
					.copied()
					.unwrap_or(false);
				return Ok((approved,).abi_encode_params());
			}
		}
		None => {}
	}

	Err(unknown(to, selector))
}

fn apply(state: &mut ChainState, tx: &Transaction) -> Result<(), DeliveryError> {
	let from = tx.from.unwrap_or_default();
	let to = tx.to.unwrap_or_default();
	let Some(selector) = tx.selector() else {
		return Ok(());
	};

	if selector == IERC20::approveCall::SELECTOR {
		let call = IERC20::approveCall::abi_decode(&tx.data).map_err(decode_error)?;
		state.allowances.insert((to, from, call.spender), call.value);
	} else if selector == IERC721::setApprovalForAllCall::SELECTOR {
		let call = IERC721::setApprovalForAllCall::abi_decode(&tx.data).map_err(decode_error)?;
		state.operators.insert((to, from, call.operator), call.approved);
	} else if selector == IDomainRegistry::setDomainCall::SELECTOR {
		let call = IDomainRegistry::setDomainCall::abi_decode(&tx.data).map_err(decode_error)?;
		state
			.domains
			.entry(domain_tag(&call.domain))
			.or_default()
			.push(call.domain);
	} else if selector == ISeaport::incrementCounterCall::SELECTOR {
		let counter = state.counters.entry(from).or_default();
		*counter += U256::from(1);
	} else if to == SEAPORT && selector == ISeaport::fulfillAvailableAdvancedOrdersCall::SELECTOR {
		let call = ISeaport::fulfillAvailableAdvancedOrdersCall::abi_decode(&tx.data)
			.map_err(decode_error)?;
		let recipient = if call.recipient.is_zero() {
			from
		} else {
			call.recipient
		};
		for order in &call.advancedOrders {
			let offerer = order.parameters.offerer;
			for item in &order.parameters.offer {
				if item.itemType != ItemType::Erc721 as u8 {
					continue;
				}
				let key = (item.token, item.identifierOrCriteria);
				if state.owners.get(&key) != Some(&offerer) {
					return Err(DeliveryError::Call(format!(
						"{} no longer owns token {}",
						offerer, item.identifierOrCriteria
					)));
				}
				state.owners.insert(key, recipient);
			}
		}
		let balance = state.native.entry(from).or_default();
		*balance = balance.saturating_sub(tx.value);
	}
	Ok(())
}

struct AcceptAll;

impl ConfigSchema for AcceptAll {
	fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
		Ok(())
	}
}

/// Delivery backend talking to a shared [`MockChain`].
pub struct MockDelivery(pub Arc<MockChain>);

#[async_trait]
impl DeliveryInterface for MockDelivery {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AcceptAll)
	}

	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		let mut state = self.0.state.lock().unwrap();
		let index = state.submitted.len();
		let hash = keccak256(U256::from(index).to_be_bytes::<32>());

		let reverted = tx
			.selector()
			.is_some_and(|selector| state.revert_selectors.contains(&selector));
		if !reverted {
			apply(&mut state, &tx)?;
		}
		state.receipts.insert(hash, !reverted);
		state.submitted.push(tx);
		Ok(TransactionHash(hash))
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		_confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.get_receipt(hash).await
	}

	async fn get_receipt(&self, hash: &TransactionHash) -> Result<TransactionReceipt, DeliveryError> {
		let state = self.0.state.lock().unwrap();
		let success = state
			.receipts
			.get(&hash.0)
			.copied()
			.ok_or_else(|| DeliveryError::Network(format!("unknown transaction {}", hash)))?;
		Ok(TransactionReceipt {
			hash: hash.clone(),
			block_number: state.submitted.len() as u64,
			success,
		})
	}

	async fn call(&self, tx: &Transaction) -> Result<Bytes, DeliveryError> {
		let state = self.0.state.lock().unwrap();
		read(&state, tx.to.unwrap_or_default(), &tx.data).map(Bytes::from)
	}

	async fn native_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		Ok(self
			.0
			.state
			.lock()
			.unwrap()
			.native
			.get(&address)
			.copied()
			.unwrap_or_default())
	}

	async fn latest_block_timestamp(&self) -> Result<u64, DeliveryError> {
		Ok(self.0.state.lock().unwrap().timestamp)
	}
}

pub fn test_config() -> SeaportConfig {
	let toml = format!(
		r#"
[network]
chain_id = 1

[contracts]
seaport = "{seaport}"
proxy_registry = "{proxy_registry}"
domain_registry = "{domain_registry}"

[contracts.conduits]
"{conduit_key}" = "{conduit}"

[approvals]
ascending_amount_timestamp_buffer = 0

[account]
private_key = "{key}"

[delivery]
rpc_url = "http://localhost:8545"
chain_id = 1
private_key = "{key}"
"#,
		seaport = SEAPORT,
		proxy_registry = PROXY_REGISTRY,
		domain_registry = DOMAIN_REGISTRY,
		conduit_key = CONDUIT_KEY,
		conduit = CONDUIT,
		key = WALLET_KEY,
	);
	ConfigLoader::from_toml(&toml).expect("test config is valid")
}

pub struct Harness {
	pub chain: Arc<MockChain>,
	pub seaport: Seaport,
	pub account: Address,
}

pub async fn harness_with(config: SeaportConfig) -> Harness {
	let chain = MockChain::new();
	let wallet = LocalWallet::new(WALLET_KEY).expect("valid key");
	let seaport = Seaport::new(
		config,
		AccountService::new(Box::new(wallet)),
		DeliveryService::new(Box::new(MockDelivery(chain.clone())), 1),
	);
	let account = seaport.account_address().await.expect("wallet address");
	Harness {
		chain,
		seaport,
		account,
	}
}

pub async fn harness() -> Harness {
	harness_with(test_config()).await
}

pub fn eth(amount: u64, recipient: Address) -> ConsiderationItem {
	ConsiderationItem {
		item_type: ItemType::Native,
		token: Address::ZERO,
		identifier_or_criteria: U256::ZERO,
		start_amount: U256::from(amount),
		end_amount: U256::from(amount),
		recipient,
	}
}

pub fn erc721_offer(id: u64) -> OfferItem {
	OfferItem {
		item_type: ItemType::Erc721,
		token: ERC721,
		identifier_or_criteria: U256::from(id),
		start_amount: U256::from(1),
		end_amount: U256::from(1),
	}
}

/// Signed order by [`OFFERER`] for the given items.
pub fn order(offer: Vec<OfferItem>, consideration: Vec<ConsiderationItem>) -> Order {
	Order {
		parameters: OrderParameters {
			offerer: OFFERER,
			zone: Address::ZERO,
			total_original_consideration_items: U256::from(consideration.len()),
			offer,
			consideration,
			order_type: OrderType::FullOpen,
			start_time: U256::from(NOW - 1_000),
			end_time: U256::from(NOW + 1_000),
			zone_hash: B256::ZERO,
			salt: U256::from(7),
			conduit_key: B256::ZERO,
		},
		signature: Bytes::from(vec![0x1b; 65]),
	}
}

/// ERC721 listing by [`OFFERER`] for `price` wei, with the NFT minted and
/// approved to the settlement contract.
pub fn listing(chain: &MockChain, id: u64, price: u64) -> Order {
	chain.mint_erc721(OFFERER, id);
	chain.approve_all(ERC721, OFFERER, SEAPORT);
	order(vec![erc721_offer(id)], vec![eth(price, OFFERER)])
}
