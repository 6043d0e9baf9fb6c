//! The single-pass pipeline turning a signer key and a requested call into a
//! submitted sponsored user operation.

pub mod bundler;
pub mod calldata;
pub mod config;
mod error;
pub mod funding;
pub mod pipeline;

pub use error::{ConfigError, SenderError};
