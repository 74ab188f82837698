mod common;

use alloy::primitives::{Address, Signature, B256, U256};
use alloy::sol_types::SolCall;
use common::*;
use seaport_core::{Action, CreateInputItem, CreateOrderInput, SeaportError, UseCaseState};
use seaport_order::fees::Fee;
use seaport_order::hash::order_signing_hash;
use seaport_order::OrderError;
use seaport_types::abi::IERC721;
use seaport_types::{ItemType, OrderType, MAX_INT};

fn nft_listing(id: u64, price: u64) -> CreateOrderInput {
	CreateOrderInput {
		offer: vec![CreateInputItem::Erc721 {
			token: ERC721,
			identifier: U256::from(id),
		}],
		consideration: vec![CreateInputItem::Currency {
			token: Address::ZERO,
			amount: U256::from(price),
			end_amount: None,
		}
		.into()],
		..Default::default()
	}
}

#[tokio::test]
async fn test_create_order_approves_then_signs() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 1);

	let use_case = h.seaport.create_order(nft_listing(1, 1_000)).await.unwrap();

	let actions: Vec<&Action> = use_case.actions().iter().collect();
	assert_eq!(actions.len(), 2);
	let Action::Approval(approval) = actions[0] else {
		panic!("expected an approval first, got {}", actions[0].kind());
	};
	assert_eq!(approval.token, ERC721);
	assert_eq!(approval.operator, SEAPORT);
	assert_eq!(
		approval.transaction.selector(),
		Some(IERC721::setApprovalForAllCall::SELECTOR)
	);
	let Action::Create(create) = actions[1] else {
		panic!("expected the create action last");
	};
	let components = create.components.clone();
	assert_eq!(components.offerer, h.account);
	assert_eq!(components.order_type, OrderType::FullOpen);
	assert_eq!(components.start_time, U256::from(NOW));
	assert_eq!(components.end_time, MAX_INT);
	assert_eq!(components.counter, U256::ZERO);
	assert_eq!(components.consideration[0].recipient, h.account);

	let order = use_case.execute_all_actions(&h.seaport).await.unwrap();
	assert_eq!(order.parameters, components);

	// the approval landed on the mock chain
	assert_eq!(h.chain.submitted().len(), 1);
	let again = h.seaport.create_order(nft_listing(1, 1_000)).await.unwrap();
	assert_eq!(again.actions().len(), 1);

	let signature = Signature::try_from(order.signature.as_ref()).unwrap();
	let digest = order_signing_hash(&order.parameters, &h.seaport.domain());
	assert_eq!(
		signature.recover_address_from_prehash(&digest).unwrap(),
		h.account
	);
}

#[tokio::test]
async fn test_create_order_through_conduit_approves_conduit() {
	let h = harness().await;
	h.chain.mint_erc1155(h.account, 9, 5);

	let input = CreateOrderInput {
		offer: vec![CreateInputItem::Erc1155 {
			token: ERC1155,
			identifier: U256::from(9),
			amount: U256::from(5),
			end_amount: None,
		}],
		consideration: vec![CreateInputItem::Currency {
			token: ERC20,
			amount: U256::from(500),
			end_amount: None,
		}
		.into()],
		conduit_key: CONDUIT_KEY,
		allow_partial_fills: true,
		..Default::default()
	};
	let use_case = h.seaport.create_order(input).await.unwrap();

	let Some(Action::Approval(approval)) = use_case.next_action() else {
		panic!("expected an approval");
	};
	assert_eq!(approval.operator, CONDUIT);
	assert_eq!(approval.item_type, ItemType::Erc1155);

	let order = use_case.execute_all_actions(&h.seaport).await.unwrap();
	assert_eq!(order.parameters.order_type, OrderType::PartialOpen);
	assert_eq!(order.parameters.conduit_key, CONDUIT_KEY);
}

#[tokio::test]
async fn test_create_order_with_fees_and_counter() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 2);
	h.chain.approve_all(ERC721, h.account, SEAPORT);

	let input = CreateOrderInput {
		fees: vec![Fee {
			recipient: FEE_RECIPIENT,
			basis_points: 250,
		}],
		counter: Some(U256::from(4)),
		salt: Some(U256::from(99)),
		..nft_listing(2, 10_000)
	};
	let use_case = h.seaport.create_order(input).await.unwrap();
	assert_eq!(use_case.actions().len(), 1);

	let Some(Action::Create(create)) = use_case.next_action() else {
		panic!("expected the create action");
	};
	let consideration = &create.components.consideration;
	assert_eq!(consideration.len(), 2);
	assert_eq!(consideration[0].start_amount, U256::from(9_750));
	assert_eq!(consideration[1].start_amount, U256::from(250));
	assert_eq!(consideration[1].recipient, FEE_RECIPIENT);
	assert_eq!(create.components.counter, U256::from(4));
	assert_eq!(create.components.salt, U256::from(99));
}

#[tokio::test]
async fn test_create_order_steps_report_state() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 3);

	let mut use_case = h.seaport.create_order(nft_listing(3, 1)).await.unwrap();
	assert_eq!(use_case.state(), UseCaseState::Pending);

	use_case.execute_next(&h.seaport).await.unwrap();
	assert_eq!(use_case.state(), UseCaseState::Creating);

	use_case.execute_next(&h.seaport).await.unwrap();
	assert_eq!(use_case.state(), UseCaseState::Done);
	assert!(use_case.execute_next(&h.seaport).await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_order_requires_offered_balance() {
	let h = harness().await;
	h.chain.mint_erc20(h.account, 10);

	let input = CreateOrderInput {
		offer: vec![CreateInputItem::Currency {
			token: ERC20,
			amount: U256::from(11),
			end_amount: None,
		}],
		consideration: vec![CreateInputItem::Erc721 {
			token: ERC721,
			identifier: U256::from(1),
		}
		.into()],
		..Default::default()
	};
	let result = h.seaport.create_order(input).await;
	assert!(matches!(
		result,
		Err(SeaportError::Order(OrderError::InsufficientBalance(_)))
	));
}

#[tokio::test]
async fn test_create_order_rejects_inverted_window() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 4);

	let input = CreateOrderInput {
		start_time: Some(U256::from(NOW)),
		end_time: Some(U256::from(NOW)),
		..nft_listing(4, 1)
	};
	let result = h.seaport.create_order(input).await;
	assert!(matches!(result, Err(SeaportError::Order(OrderError::Validation(_)))));
}

#[tokio::test]
async fn test_create_order_rejects_unknown_conduit() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 5);

	let input = CreateOrderInput {
		conduit_key: B256::repeat_byte(0x42),
		..nft_listing(5, 1)
	};
	assert!(matches!(
		h.seaport.create_order(input).await,
		Err(SeaportError::Configuration(_))
	));
}

#[tokio::test]
async fn test_create_order_prefers_covering_proxy() {
	let proxy = Address::repeat_byte(0x99);
	let h = harness().await;
	h.chain.set_proxy(h.account, proxy);
	h.chain.mint_erc721(h.account, 6);
	h.chain.approve_all(ERC721, h.account, proxy);

	let use_case = h.seaport.create_order(nft_listing(6, 1)).await.unwrap();
	assert_eq!(use_case.actions().len(), 1);
	let Some(Action::Create(create)) = use_case.next_action() else {
		panic!("expected the create action");
	};
	assert_eq!(create.components.order_type, OrderType::FullOpenViaProxy);
}

#[tokio::test]
async fn test_create_order_requires_consideration_for_single_item() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 7);

	let input = CreateOrderInput {
		consideration: Vec::new(),
		..nft_listing(7, 1)
	};
	let result = h.seaport.create_order(input).await;
	assert!(matches!(result, Err(SeaportError::Order(OrderError::Validation(_)))));
}
