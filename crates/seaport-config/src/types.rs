//! Configuration types for the Seaport client.

use crate::serde_helpers::{deserialize_conduit_map, serialize_conduit_map};
use alloy::primitives::{Address, B256};
use seaport_types::{
	ApprovalStrategy, CROSS_CHAIN_SEAPORT_ADDRESS, DEFAULT_ASCENDING_AMOUNT_TIMESTAMP_BUFFER,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeaportConfig {
	/// Chain the client operates on
	pub network: NetworkConfig,
	/// Contract addresses
	#[serde(default)]
	pub contracts: ContractsConfig,
	/// Approval planning
	#[serde(default)]
	pub approvals: ApprovalConfig,
	/// Signing backend settings, handed to the account factory
	pub account: toml::Value,
	/// Transaction delivery settings, handed to the delivery factory
	pub delivery: toml::Value,
	/// Logging
	#[serde(default)]
	pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub chain_id: u64,
	/// Block confirmations to wait for after each action
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
}

fn default_confirmations() -> u64 {
	1
}

/// Contract addresses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractsConfig {
	/// Settlement contract
	#[serde(default = "default_seaport")]
	pub seaport: Address,
	/// Legacy per-account proxy registry
	pub proxy_registry: Option<Address>,
	/// Registry of marketplace domain tags
	pub domain_registry: Option<Address>,
	/// Conduit address for each conduit key the client may use
	#[serde(
		default,
		deserialize_with = "deserialize_conduit_map",
		serialize_with = "serialize_conduit_map"
	)]
	pub conduits: HashMap<B256, Address>,
}

fn default_seaport() -> Address {
	CROSS_CHAIN_SEAPORT_ADDRESS
}

impl Default for ContractsConfig {
	fn default() -> Self {
		Self {
			seaport: default_seaport(),
			proxy_registry: None,
			domain_registry: None,
			conduits: HashMap::new(),
		}
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApprovalConfig {
	#[serde(default)]
	pub strategy: ApprovalStrategy,
	/// Seconds added to the block timestamp when pricing ascending amounts
	#[serde(default = "default_buffer")]
	pub ascending_amount_timestamp_buffer: u64,
}

fn default_buffer() -> u64 {
	DEFAULT_ASCENDING_AMOUNT_TIMESTAMP_BUFFER
}

impl Default for ApprovalConfig {
	fn default() -> Self {
		Self {
			strategy: ApprovalStrategy::default(),
			ascending_amount_timestamp_buffer: default_buffer(),
		}
	}
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
	#[serde(default = "default_log_level")]
	pub level: String,
}

fn default_log_level() -> String {
	"info".to_string()
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_log_level(),
		}
	}
}
