//! Sponsored user operation (ERC-4337) primitive types
//!
//! This crate contains the user operation type, the signer wallet wrapper and
//! helper functions shared by the Pilum crates.

pub mod bundler;
pub mod constants;
pub mod provider;
mod user_operation;
mod utils;
mod wallet;

pub use bundler::{GasFee, UserOperationGasPrice};
pub use user_operation::{UserOperation, UserOperationHash};
pub use utils::as_checksum;
pub use wallet::Wallet;
