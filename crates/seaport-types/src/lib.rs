//! Shared types for the Seaport client workspace.
//!
//! Items, orders, fulfillment directives, transactions and receipts live here
//! together with the contract ABI so that every other crate speaks the same
//! vocabulary.

pub mod abi;
pub mod account;
pub mod approval;
pub mod constants;
pub mod delivery;
pub mod fulfillment;
pub mod item;
pub mod order;
pub mod validation;

pub use account::*;
pub use approval::*;
pub use constants::*;
pub use delivery::*;
pub use fulfillment::*;
pub use item::*;
pub use order::*;
pub use validation::*;
