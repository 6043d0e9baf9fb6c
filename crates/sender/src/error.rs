use ethers::types::{Address, U256};
use pilum_contracts::{EntryPointError, SafeError, TokenError};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    /// An environment variable could not be parsed
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid {
        /// Name of the variable
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The requested chain is not in the supported set
    #[error("chain {0} is not supported (supported: sepolia)")]
    UnsupportedChain(String),

    /// The supplied chain id does not belong to the requested chain
    #[error("chain id {chain_id} does not match chain {chain}")]
    ChainIdMismatch {
        /// The requested chain name
        chain: String,
        /// The supplied chain id
        chain_id: u64,
    },
}

/// Pipeline errors; all fatal, none are retried
#[derive(Debug, Error)]
pub enum SenderError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Safe account derivation or signing error
    #[error(transparent)]
    Safe(#[from] SafeError),

    /// Entry point error
    #[error(transparent)]
    EntryPoint(#[from] EntryPointError),

    /// Token contract error
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Signer wallet error
    #[error("wallet error: {inner}")]
    Wallet {
        /// The inner error message
        inner: String,
    },

    /// Bundler RPC error
    #[error("bundler error: {inner}")]
    Bundler {
        /// The inner error message
        inner: String,
    },

    /// Node provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// The funding gate gave up waiting for the balance to reach the threshold
    #[error("timed out waiting for funding: {holder:?} needs {threshold} base units of token {token:?}")]
    FundingTimeout {
        /// The token being waited on
        token: Address,
        /// The account being funded
        holder: Address,
        /// The required balance in base units
        threshold: U256,
    },
}
