//! Offer and consideration items.
//!
//! An item is a unit of value moved by the settlement contract: native
//! currency, an ERC20 amount, or one or more ERC721/ERC1155 tokens. Criteria
//! item types carry a merkle root over acceptable identifiers instead of a
//! concrete identifier.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an item, encoded on-chain as a `uint8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ItemType {
	Native = 0,
	Erc20 = 1,
	Erc721 = 2,
	Erc1155 = 3,
	Erc721WithCriteria = 4,
	Erc1155WithCriteria = 5,
}

impl ItemType {
	pub fn is_native(self) -> bool {
		self == ItemType::Native
	}

	pub fn is_erc20(self) -> bool {
		self == ItemType::Erc20
	}

	/// Native currency or ERC20.
	pub fn is_currency(self) -> bool {
		matches!(self, ItemType::Native | ItemType::Erc20)
	}

	pub fn is_erc721(self) -> bool {
		matches!(self, ItemType::Erc721 | ItemType::Erc721WithCriteria)
	}

	pub fn is_erc1155(self) -> bool {
		matches!(self, ItemType::Erc1155 | ItemType::Erc1155WithCriteria)
	}

	/// Any ERC721 or ERC1155 item, with or without criteria.
	pub fn is_nft(self) -> bool {
		self.is_erc721() || self.is_erc1155()
	}

	pub fn is_criteria(self) -> bool {
		matches!(
			self,
			ItemType::Erc721WithCriteria | ItemType::Erc1155WithCriteria
		)
	}

	/// Item type an identifier resolves to once criteria are applied.
	pub fn resolved(self) -> ItemType {
		match self {
			ItemType::Erc721WithCriteria => ItemType::Erc721,
			ItemType::Erc1155WithCriteria => ItemType::Erc1155,
			other => other,
		}
	}
}

impl From<ItemType> for u8 {
	fn from(item_type: ItemType) -> Self {
		item_type as u8
	}
}

impl TryFrom<u8> for ItemType {
	type Error = String;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(ItemType::Native),
			1 => Ok(ItemType::Erc20),
			2 => Ok(ItemType::Erc721),
			3 => Ok(ItemType::Erc1155),
			4 => Ok(ItemType::Erc721WithCriteria),
			5 => Ok(ItemType::Erc1155WithCriteria),
			other => Err(format!("Unknown item type: {}", other)),
		}
	}
}

impl fmt::Display for ItemType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ItemType::Native => "NATIVE",
			ItemType::Erc20 => "ERC20",
			ItemType::Erc721 => "ERC721",
			ItemType::Erc1155 => "ERC1155",
			ItemType::Erc721WithCriteria => "ERC721_WITH_CRITERIA",
			ItemType::Erc1155WithCriteria => "ERC1155_WITH_CRITERIA",
		};
		f.write_str(name)
	}
}

/// Read access shared by offer and consideration items.
pub trait Item {
	fn item_type(&self) -> ItemType;
	fn token(&self) -> Address;
	fn identifier_or_criteria(&self) -> U256;
	fn start_amount(&self) -> U256;
	fn end_amount(&self) -> U256;

	/// Recipient of a consideration item; offer items have none.
	fn recipient(&self) -> Option<Address> {
		None
	}

	/// True when the amount does not change over the order's lifetime.
	fn has_fixed_amount(&self) -> bool {
		self.start_amount() == self.end_amount()
	}
}

/// Item the offerer gives up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub start_amount: U256,
	pub end_amount: U256,
}

/// Item the offerer demands, paid to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsiderationItem {
	pub item_type: ItemType,
	pub token: Address,
	pub identifier_or_criteria: U256,
	pub start_amount: U256,
	pub end_amount: U256,
	pub recipient: Address,
}

impl OfferItem {
	/// Turns this offer item into a consideration item paid to `recipient`.
	pub fn to_consideration(&self, recipient: Address) -> ConsiderationItem {
		ConsiderationItem {
			item_type: self.item_type,
			token: self.token,
			identifier_or_criteria: self.identifier_or_criteria,
			start_amount: self.start_amount,
			end_amount: self.end_amount,
			recipient,
		}
	}
}

impl ConsiderationItem {
	/// Drops the recipient, yielding the equivalent offer item.
	pub fn to_offer(&self) -> OfferItem {
		OfferItem {
			item_type: self.item_type,
			token: self.token,
			identifier_or_criteria: self.identifier_or_criteria,
			start_amount: self.start_amount,
			end_amount: self.end_amount,
		}
	}
}

impl Item for OfferItem {
	fn item_type(&self) -> ItemType {
		self.item_type
	}
	fn token(&self) -> Address {
		self.token
	}
	fn identifier_or_criteria(&self) -> U256 {
		self.identifier_or_criteria
	}
	fn start_amount(&self) -> U256 {
		self.start_amount
	}
	fn end_amount(&self) -> U256 {
		self.end_amount
	}
}

impl Item for ConsiderationItem {
	fn item_type(&self) -> ItemType {
		self.item_type
	}
	fn token(&self) -> Address {
		self.token
	}
	fn identifier_or_criteria(&self) -> U256 {
		self.identifier_or_criteria
	}
	fn start_amount(&self) -> U256 {
		self.start_amount
	}
	fn end_amount(&self) -> U256 {
		self.end_amount
	}
	fn recipient(&self) -> Option<Address> {
		Some(self.recipient)
	}
}
