//! Order creation.

use crate::actions::{Action, CreateOrder, CreateOrderAction, OrderUseCase};
use crate::approval::Operators;
use crate::balance::{check_balances, ItemRequirement};
use crate::{Seaport, SeaportError};
use alloy::primitives::{Address, B256, U256};
use seaport_order::fees::{deduct_fees, fee_consideration_items, Fee};
use seaport_order::{ensure_consideration, MerkleTree, OrderError};
use seaport_types::{
	ConsiderationItem, ItemType, OfferItem, OrderComponents, OrderType, MAX_INT, NO_CONDUIT,
};

/// Item as described by the order creator.
///
/// Currency items use the zero address for native currency. Criteria items
/// list the identifiers they accept; an empty list accepts any identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateInputItem {
	Currency {
		token: Address,
		amount: U256,
		end_amount: Option<U256>,
	},
	Erc721 {
		token: Address,
		identifier: U256,
	},
	Erc721WithCriteria {
		token: Address,
		identifiers: Vec<U256>,
		amount: U256,
	},
	Erc1155 {
		token: Address,
		identifier: U256,
		amount: U256,
		end_amount: Option<U256>,
	},
	Erc1155WithCriteria {
		token: Address,
		identifiers: Vec<U256>,
		amount: U256,
		end_amount: Option<U256>,
	},
}

fn criteria_root(identifiers: &[U256]) -> U256 {
	MerkleTree::new(identifiers).criteria()
}

impl CreateInputItem {
	pub fn to_offer_item(&self) -> OfferItem {
		let (item_type, token, identifier_or_criteria, start_amount, end_amount) = match self {
			CreateInputItem::Currency {
				token,
				amount,
				end_amount,
			} => {
				let item_type = if token.is_zero() {
					ItemType::Native
				} else {
					ItemType::Erc20
				};
				(item_type, *token, U256::ZERO, *amount, end_amount.unwrap_or(*amount))
			}
			CreateInputItem::Erc721 { token, identifier } => {
				(ItemType::Erc721, *token, *identifier, U256::from(1), U256::from(1))
			}
			CreateInputItem::Erc721WithCriteria {
				token,
				identifiers,
				amount,
			} => (
				ItemType::Erc721WithCriteria,
				*token,
				criteria_root(identifiers),
				*amount,
				*amount,
			),
			CreateInputItem::Erc1155 {
				token,
				identifier,
				amount,
				end_amount,
			} => (
				ItemType::Erc1155,
				*token,
				*identifier,
				*amount,
				end_amount.unwrap_or(*amount),
			),
			CreateInputItem::Erc1155WithCriteria {
				token,
				identifiers,
				amount,
				end_amount,
			} => (
				ItemType::Erc1155WithCriteria,
				*token,
				criteria_root(identifiers),
				*amount,
				end_amount.unwrap_or(*amount),
			),
		};

		OfferItem {
			item_type,
			token,
			identifier_or_criteria,
			start_amount,
			end_amount,
		}
	}
}

/// Consideration entry; paid to the offerer unless `recipient` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsiderationInputItem {
	pub item: CreateInputItem,
	pub recipient: Option<Address>,
}

impl From<CreateInputItem> for ConsiderationInputItem {
	fn from(item: CreateInputItem) -> Self {
		Self {
			item,
			recipient: None,
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct CreateOrderInput {
	pub offer: Vec<CreateInputItem>,
	pub consideration: Vec<ConsiderationInputItem>,
	/// Marketplace fees, deducted from the currency consideration and paid
	/// out as extra consideration items.
	pub fees: Vec<Fee>,
	pub zone: Address,
	pub zone_hash: B256,
	pub conduit_key: B256,
	/// Defaults to the latest block timestamp.
	pub start_time: Option<U256>,
	/// Defaults to never expiring.
	pub end_time: Option<U256>,
	/// Defaults to a random value.
	pub salt: Option<U256>,
	/// Defaults to the offerer's current counter.
	pub counter: Option<U256>,
	pub allow_partial_fills: bool,
	pub restricted_by_zone: bool,
}

fn random_salt() -> U256 {
	U256::from_be_slice(uuid::Uuid::new_v4().as_bytes())
}

/// Consideration items with fees applied.
///
/// All currency items of the order must share one token. Fees are computed
/// on the summed currency amounts of both sides and ignored when the order
/// carries no currency.
fn consideration_with_fees(
	offer: &[OfferItem],
	consideration: Vec<ConsiderationItem>,
	fees: &[Fee],
) -> Result<Vec<ConsiderationItem>, OrderError> {
	let currencies: Vec<(Address, U256, U256)> = offer
		.iter()
		.map(|i| (i.item_type, i.token, i.start_amount, i.end_amount))
		.chain(
			consideration
				.iter()
				.map(|i| (i.item_type, i.token, i.start_amount, i.end_amount)),
		)
		.filter(|(item_type, ..)| item_type.is_currency())
		.map(|(_, token, start, end)| (token, start, end))
		.collect();

	let Some(&(token, ..)) = currencies.first() else {
		return Ok(consideration);
	};
	if currencies.iter().any(|(other, ..)| *other != token) {
		return Err(OrderError::Validation(
			"all currency tokens in the order must be the same token".into(),
		));
	}
	if fees.is_empty() {
		return Ok(consideration);
	}

	let (base_start, base_end) = currencies
		.iter()
		.fold((U256::ZERO, U256::ZERO), |(start, end), (_, s, e)| {
			(start.saturating_add(*s), end.saturating_add(*e))
		});

	let mut items = deduct_fees(&consideration, fees)?;
	items.extend(fee_consideration_items(fees, token, base_start, base_end)?);
	Ok(items)
}

impl Seaport {
	/// Plans a new order offered by the configured account.
	///
	/// Reads the offerer's balances, approvals, counter and the latest block
	/// timestamp in one batch, refuses offers the account cannot cover, and
	/// returns the missing approvals followed by the signing action.
	pub async fn create_order(
		&self,
		input: CreateOrderInput,
	) -> Result<OrderUseCase<CreateOrder>, SeaportError> {
		let offerer = self.account_address().await?;

		let offer: Vec<OfferItem> = input.offer.iter().map(CreateInputItem::to_offer_item).collect();
		let consideration: Vec<ConsiderationItem> = input
			.consideration
			.iter()
			.map(|entry| {
				entry
					.item
					.to_offer_item()
					.to_consideration(entry.recipient.unwrap_or(offerer))
			})
			.collect();
		let consideration = consideration_with_fees(&offer, consideration, &input.fees)?;
		ensure_consideration(&offer, &consideration)?;

		let operators = Operators {
			direct: self.conduit_operator(input.conduit_key)?,
			proxy: if input.conduit_key == NO_CONDUIT {
				self.proxy_of(offerer).await?
			} else {
				None
			},
		};

		let requirements: Vec<ItemRequirement> = offer
			.iter()
			.map(|item| ItemRequirement::for_item(item, None, None))
			.collect();

		let operator_addresses = operators.all();
		let (snapshot, counter, now) = futures::try_join!(
			self.balances
				.snapshot(offerer, &requirements, &operator_addresses),
			async {
				match input.counter {
					Some(counter) => Ok(counter),
					None => self.contract.get_counter(offerer).await,
				}
			},
			async { Ok::<_, SeaportError>(self.delivery.latest_block_timestamp().await?) },
		)?;

		check_balances(&requirements, &snapshot)?;
		let plan = self.planner.plan(&requirements, &snapshot, &operators);

		let start_time = input.start_time.unwrap_or(U256::from(now));
		let end_time = input.end_time.unwrap_or(MAX_INT);
		if end_time <= start_time {
			return Err(OrderError::Validation(format!(
				"end time {} must be after start time {}",
				end_time, start_time
			))
			.into());
		}

		let components = OrderComponents {
			offerer,
			zone: input.zone,
			offer,
			consideration,
			order_type: OrderType::from_flags(
				input.allow_partial_fills,
				input.restricted_by_zone,
				plan.uses_proxy,
			),
			start_time,
			end_time,
			zone_hash: input.zone_hash,
			salt: input.salt.unwrap_or_else(random_salt),
			conduit_key: input.conduit_key,
			counter,
		};

		tracing::info!(
			offerer = %offerer,
			order_type = ?components.order_type,
			offer_items = components.offer.len(),
			consideration_items = components.consideration.len(),
			approvals = plan.approvals.len(),
			"Planned order creation"
		);

		let mut actions: Vec<Action> = plan.approvals.into_iter().map(Action::Approval).collect();
		actions.push(Action::Create(CreateOrderAction {
			components,
			domain: self.domain(),
		}));
		Ok(OrderUseCase::new(actions))
	}
}
