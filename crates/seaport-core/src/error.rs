// seaport-core/src/error.rs

use seaport_account::AccountError;
use seaport_delivery::DeliveryError;
use seaport_order::OrderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeaportError {
	#[error(transparent)]
	Order(#[from] OrderError),

	#[error("Account error: {0}")]
	Account(#[from] AccountError),

	#[error("Delivery error: {0}")]
	Delivery(DeliveryError),

	#[error("Transaction reverted: {0}")]
	TransactionReverted(String),

	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("Decode error: {0}")]
	Decode(String),

	#[error("Unexpected action: {0}")]
	UnexpectedAction(String),
}

impl From<DeliveryError> for SeaportError {
	fn from(error: DeliveryError) -> Self {
		match error {
			DeliveryError::TransactionFailed(reason) => SeaportError::TransactionReverted(reason),
			other => SeaportError::Delivery(other),
		}
	}
}
