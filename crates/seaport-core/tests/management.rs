mod common;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use common::*;
use seaport_core::{Action, SeaportError};
use seaport_order::hash::{domain_tag, order_hash};
use seaport_order::OrderError;
use seaport_types::abi::{IDomainRegistry, ISeaport};
use seaport_types::OrderStatus;

#[tokio::test]
async fn test_cancel_requires_offerer_or_zone() {
	let h = harness().await;
	let foreign = order(vec![erc721_offer(1)], vec![eth(1, OFFERER)]);

	let result = h
		.seaport
		.cancel_orders(vec![foreign.parameters.to_components(U256::ZERO)])
		.await;
	assert!(matches!(result, Err(SeaportError::Order(OrderError::Validation(_)))));
}

#[tokio::test]
async fn test_cancel_own_and_zoned_orders() {
	let h = harness().await;
	let mut own = order(vec![erc721_offer(1)], vec![eth(1, OFFERER)]);
	own.parameters.offerer = h.account;
	let mut zoned = order(vec![erc721_offer(2)], vec![eth(1, OFFERER)]);
	zoned.parameters.zone = h.account;

	let use_case = h
		.seaport
		.cancel_orders(vec![
			own.parameters.to_components(U256::ZERO),
			zoned.parameters.to_components(U256::ZERO),
		])
		.await
		.unwrap();

	assert_eq!(use_case.actions().len(), 1);
	let Some(Action::Exchange(exchange)) = use_case.next_action() else {
		panic!("expected the cancel call");
	};
	let call = ISeaport::cancelCall::abi_decode(&exchange.transaction.data).unwrap();
	assert_eq!(call.orders.len(), 2);

	use_case.execute_all_actions(&h.seaport).await.unwrap();
}

#[tokio::test]
async fn test_bulk_cancel_increments_counter() {
	let h = harness().await;
	assert_eq!(h.seaport.get_counter(h.account).await.unwrap(), U256::ZERO);

	let use_case = h.seaport.bulk_cancel_orders().await.unwrap();
	use_case.execute_all_actions(&h.seaport).await.unwrap();

	assert_eq!(h.seaport.get_counter(h.account).await.unwrap(), U256::from(1));
	let counters = h.seaport.get_counters(&[h.account, OFFERER]).await.unwrap();
	assert_eq!(counters, vec![U256::from(1), U256::ZERO]);
}

#[tokio::test]
async fn test_validate_approves_offer_first() {
	let h = harness().await;
	h.chain.mint_erc721(h.account, 3);
	let mut own = order(vec![erc721_offer(3)], vec![eth(10, OFFERER)]);
	own.parameters.offerer = h.account;

	let use_case = h.seaport.validate(vec![own]).await.unwrap();

	let actions: Vec<&Action> = use_case.actions().iter().collect();
	assert_eq!(actions.len(), 2);
	assert!(matches!(actions[0], Action::Approval(a) if a.operator == SEAPORT));
	assert_eq!(
		actions[1].transaction().and_then(|tx| tx.selector()),
		Some(ISeaport::validateCall::SELECTOR)
	);
}

#[tokio::test]
async fn test_validate_rejects_foreign_orders() {
	let h = harness().await;
	let foreign = order(vec![erc721_offer(4)], vec![eth(10, OFFERER)]);

	let result = h.seaport.validate(vec![foreign]).await;
	assert!(matches!(result, Err(SeaportError::Order(OrderError::Validation(_)))));
}

#[tokio::test]
async fn test_order_status_and_hash_reads() {
	let h = harness().await;
	let components = order(vec![erc721_offer(5)], vec![eth(10, OFFERER)])
		.parameters
		.to_components(U256::ZERO);
	let hash = h.seaport.get_order_hash(&components);
	assert_eq!(hash, order_hash(&components));

	let status = OrderStatus {
		is_validated: true,
		is_cancelled: false,
		total_filled: U256::from(1),
		total_size: U256::from(4),
	};
	h.chain.set_status(hash, status);
	assert_eq!(h.seaport.get_order_status(hash).await.unwrap(), status);

	let info = h.seaport.information().await.unwrap();
	assert_eq!(info.version, "1.1");
	assert_eq!(info.conduit_controller, CONDUIT);
}

#[tokio::test]
async fn test_domain_registration_round_trip() {
	let h = harness().await;
	let tag = domain_tag("opensea.io");

	let use_case = h.seaport.set_domain("opensea.io").await.unwrap();
	let Some(Action::Exchange(exchange)) = use_case.next_action() else {
		panic!("expected the registration call");
	};
	assert_eq!(exchange.transaction.to, Some(DOMAIN_REGISTRY));
	assert_eq!(
		exchange.transaction.selector(),
		Some(IDomainRegistry::setDomainCall::SELECTOR)
	);
	use_case.execute_all_actions(&h.seaport).await.unwrap();

	assert_eq!(h.seaport.get_number_of_domains(tag).await.unwrap(), U256::from(1));
	assert_eq!(h.seaport.get_domains(tag).await.unwrap(), vec!["opensea.io".to_string()]);
	assert_eq!(
		h.seaport.get_domain(tag, U256::ZERO).await.unwrap(),
		"opensea.io"
	);
	assert!(h.seaport.get_domain(tag, U256::from(1)).await.is_err());
}

#[tokio::test]
async fn test_domain_reads_need_a_registry() {
	let mut config = test_config();
	config.contracts.domain_registry = None;
	let h = harness_with(config).await;

	assert!(matches!(
		h.seaport.set_domain("opensea.io").await,
		Err(SeaportError::Configuration(_))
	));
	assert!(matches!(
		h.seaport.get_domains(domain_tag("opensea.io")).await,
		Err(SeaportError::Configuration(_))
	));
}

#[tokio::test]
async fn test_proxy_lookup() {
	let h = harness().await;
	let proxy = Address::repeat_byte(0x99);
	assert_eq!(h.seaport.proxy_of(h.account).await.unwrap(), None);

	h.chain.set_proxy(h.account, proxy);
	assert_eq!(h.seaport.proxy_of(h.account).await.unwrap(), Some(proxy));
}
