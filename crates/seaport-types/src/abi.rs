//! Solidity ABI of the settlement contract and the token standards it moves.
//!
//! The structs double as the EIP-712 schema: `OrderComponents` hashes with
//! the exact type string the contract uses to verify signatures.

use alloy::primitives::{Uint, U256};
use alloy::sol;

sol! {
	#[derive(Debug, PartialEq, Eq)]
	struct OfferItem {
		uint8 itemType;
		address token;
		uint256 identifierOrCriteria;
		uint256 startAmount;
		uint256 endAmount;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct ConsiderationItem {
		uint8 itemType;
		address token;
		uint256 identifierOrCriteria;
		uint256 startAmount;
		uint256 endAmount;
		address recipient;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct OrderComponents {
		address offerer;
		address zone;
		OfferItem[] offer;
		ConsiderationItem[] consideration;
		uint8 orderType;
		uint256 startTime;
		uint256 endTime;
		bytes32 zoneHash;
		uint256 salt;
		bytes32 conduitKey;
		uint256 counter;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct OrderParameters {
		address offerer;
		address zone;
		OfferItem[] offer;
		ConsiderationItem[] consideration;
		uint8 orderType;
		uint256 startTime;
		uint256 endTime;
		bytes32 zoneHash;
		uint256 salt;
		bytes32 conduitKey;
		uint256 totalOriginalConsiderationItems;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct Order {
		OrderParameters parameters;
		bytes signature;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct AdvancedOrder {
		OrderParameters parameters;
		uint120 numerator;
		uint120 denominator;
		bytes signature;
		bytes extraData;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct CriteriaResolver {
		uint256 orderIndex;
		uint8 side;
		uint256 index;
		uint256 identifier;
		bytes32[] criteriaProof;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct FulfillmentComponent {
		uint256 orderIndex;
		uint256 itemIndex;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct Fulfillment {
		FulfillmentComponent[] offerComponents;
		FulfillmentComponent[] considerationComponents;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct AdditionalRecipient {
		uint256 amount;
		address recipient;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct BasicOrderParameters {
		address considerationToken;
		uint256 considerationIdentifier;
		uint256 considerationAmount;
		address offerer;
		address zone;
		address offerToken;
		uint256 offerIdentifier;
		uint256 offerAmount;
		uint8 basicOrderType;
		uint256 startTime;
		uint256 endTime;
		bytes32 zoneHash;
		uint256 salt;
		bytes32 offererConduitKey;
		bytes32 fulfillerConduitKey;
		uint256 totalOriginalAdditionalRecipients;
		AdditionalRecipient[] additionalRecipients;
		bytes signature;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct ReceivedItem {
		uint8 itemType;
		address token;
		uint256 identifier;
		uint256 amount;
		address recipient;
	}

	#[derive(Debug, PartialEq, Eq)]
	struct Execution {
		ReceivedItem item;
		address offerer;
		bytes32 conduitKey;
	}

	interface ISeaport {
		function fulfillBasicOrder(BasicOrderParameters calldata parameters) external payable returns (bool fulfilled);
		function fulfillOrder(Order calldata order, bytes32 fulfillerConduitKey) external payable returns (bool fulfilled);
		function fulfillAdvancedOrder(AdvancedOrder calldata advancedOrder, CriteriaResolver[] calldata criteriaResolvers, bytes32 fulfillerConduitKey, address recipient) external payable returns (bool fulfilled);
		function fulfillAvailableAdvancedOrders(AdvancedOrder[] calldata advancedOrders, CriteriaResolver[] calldata criteriaResolvers, FulfillmentComponent[][] calldata offerFulfillments, FulfillmentComponent[][] calldata considerationFulfillments, bytes32 fulfillerConduitKey, address recipient, uint256 maximumFulfilled) external payable returns (bool[] memory availableOrders, Execution[] memory executions);
		function matchOrders(Order[] calldata orders, Fulfillment[] calldata fulfillments) external payable returns (Execution[] memory executions);
		function matchAdvancedOrders(AdvancedOrder[] calldata orders, CriteriaResolver[] calldata criteriaResolvers, Fulfillment[] calldata fulfillments) external payable returns (Execution[] memory executions);
		function cancel(OrderComponents[] calldata orders) external returns (bool cancelled);
		function validate(Order[] calldata orders) external returns (bool validated);
		function incrementCounter() external returns (uint256 newCounter);
		function getOrderHash(OrderComponents calldata order) external view returns (bytes32 orderHash);
		function getOrderStatus(bytes32 orderHash) external view returns (bool isValidated, bool isCancelled, uint256 totalFilled, uint256 totalSize);
		function getCounter(address offerer) external view returns (uint256 counter);
		function information() external view returns (string memory version, bytes32 domainSeparator, address conduitController);
		function name() external view returns (string memory contractName);
	}

	interface IERC20 {
		function approve(address spender, uint256 value) external returns (bool);
		function allowance(address owner, address spender) external view returns (uint256);
		function balanceOf(address account) external view returns (uint256);
	}

	interface IERC721 {
		function setApprovalForAll(address operator, bool approved) external;
		function isApprovedForAll(address owner, address operator) external view returns (bool);
		function ownerOf(uint256 tokenId) external view returns (address);
		function balanceOf(address owner) external view returns (uint256);
	}

	interface IERC1155 {
		function setApprovalForAll(address operator, bool approved) external;
		function isApprovedForAll(address account, address operator) external view returns (bool);
		function balanceOf(address account, uint256 id) external view returns (uint256);
	}

	interface IProxyRegistry {
		function proxies(address owner) external view returns (address);
	}

	interface IDomainRegistry {
		function setDomain(string calldata domain) external returns (bytes4 tag);
		function getDomains(bytes4 tag) external view returns (string[] memory domains);
		function getNumberOfDomains(bytes4 tag) external view returns (uint256 count);
		function getDomain(bytes4 tag, uint256 index) external view returns (string memory domain);
	}
}

impl From<&crate::OfferItem> for OfferItem {
	fn from(item: &crate::OfferItem) -> Self {
		OfferItem {
			itemType: item.item_type.into(),
			token: item.token,
			identifierOrCriteria: item.identifier_or_criteria,
			startAmount: item.start_amount,
			endAmount: item.end_amount,
		}
	}
}

impl From<&crate::ConsiderationItem> for ConsiderationItem {
	fn from(item: &crate::ConsiderationItem) -> Self {
		ConsiderationItem {
			itemType: item.item_type.into(),
			token: item.token,
			identifierOrCriteria: item.identifier_or_criteria,
			startAmount: item.start_amount,
			endAmount: item.end_amount,
			recipient: item.recipient,
		}
	}
}

impl From<&crate::OrderComponents> for OrderComponents {
	fn from(order: &crate::OrderComponents) -> Self {
		OrderComponents {
			offerer: order.offerer,
			zone: order.zone,
			offer: order.offer.iter().map(Into::into).collect(),
			consideration: order.consideration.iter().map(Into::into).collect(),
			orderType: order.order_type.into(),
			startTime: order.start_time,
			endTime: order.end_time,
			zoneHash: order.zone_hash,
			salt: order.salt,
			conduitKey: order.conduit_key,
			counter: order.counter,
		}
	}
}

impl From<&crate::OrderParameters> for OrderParameters {
	fn from(order: &crate::OrderParameters) -> Self {
		OrderParameters {
			offerer: order.offerer,
			zone: order.zone,
			offer: order.offer.iter().map(Into::into).collect(),
			consideration: order.consideration.iter().map(Into::into).collect(),
			orderType: order.order_type.into(),
			startTime: order.start_time,
			endTime: order.end_time,
			zoneHash: order.zone_hash,
			salt: order.salt,
			conduitKey: order.conduit_key,
			totalOriginalConsiderationItems: order.total_original_consideration_items,
		}
	}
}

impl From<&crate::Order> for Order {
	fn from(order: &crate::Order) -> Self {
		Order {
			parameters: (&order.parameters).into(),
			signature: order.signature.clone(),
		}
	}
}

fn to_uint120(field: &str, value: U256) -> Result<Uint<120, 2>, String> {
	Uint::<120, 2>::checked_from_uint(value)
		.ok_or_else(|| format!("{} {} does not fit in uint120", field, value))
}

impl TryFrom<&crate::AdvancedOrder> for AdvancedOrder {
	type Error = String;

	fn try_from(order: &crate::AdvancedOrder) -> Result<Self, Self::Error> {
		Ok(AdvancedOrder {
			parameters: (&order.parameters).into(),
			numerator: to_uint120("numerator", order.numerator)?,
			denominator: to_uint120("denominator", order.denominator)?,
			signature: order.signature.clone(),
			extraData: order.extra_data.clone(),
		})
	}
}

impl From<&crate::CriteriaResolver> for CriteriaResolver {
	fn from(resolver: &crate::CriteriaResolver) -> Self {
		CriteriaResolver {
			orderIndex: U256::from(resolver.order_index),
			side: resolver.side as u8,
			index: U256::from(resolver.index),
			identifier: resolver.identifier,
			criteriaProof: resolver.criteria_proof.clone(),
		}
	}
}

impl From<&crate::FulfillmentComponent> for FulfillmentComponent {
	fn from(component: &crate::FulfillmentComponent) -> Self {
		FulfillmentComponent {
			orderIndex: U256::from(component.order_index),
			itemIndex: U256::from(component.item_index),
		}
	}
}

impl From<&crate::Fulfillment> for Fulfillment {
	fn from(fulfillment: &crate::Fulfillment) -> Self {
		Fulfillment {
			offerComponents: fulfillment.offer_components.iter().map(Into::into).collect(),
			considerationComponents: fulfillment
				.consideration_components
				.iter()
				.map(Into::into)
				.collect(),
		}
	}
}

impl From<ISeaport::getOrderStatusReturn> for crate::OrderStatus {
	fn from(status: ISeaport::getOrderStatusReturn) -> Self {
		crate::OrderStatus {
			is_validated: status.isValidated,
			is_cancelled: status.isCancelled,
			total_filled: status.totalFilled,
			total_size: status.totalSize,
		}
	}
}

/// Converts component groups into the nested ABI arrays.
pub fn component_groups(groups: &[Vec<crate::FulfillmentComponent>]) -> Vec<Vec<FulfillmentComponent>> {
	groups
		.iter()
		.map(|group| group.iter().map(Into::into).collect())
		.collect()
}
