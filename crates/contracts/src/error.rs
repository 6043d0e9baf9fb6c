use thiserror::Error;

/// Entry point errors
#[derive(Debug, Error, Clone)]
pub enum EntryPointError {
    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

/// Safe account derivation and signing errors
#[derive(Debug, Error, Clone)]
pub enum SafeError {
    /// No address set known for the requested account version and chain
    #[error("no address set for account version {version} on chain {chain_id}")]
    UnknownAddressSet {
        /// The requested account version tag
        version: String,
        /// The requested chain id
        chain_id: u64,
    },

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// Signing error
    #[error("signer error: {inner}")]
    Signer {
        /// The inner error message
        inner: String,
    },
}

/// Token contract errors
#[derive(Debug, Error, Clone)]
pub enum TokenError {
    /// Contract call error
    #[error("contract error: {inner}")]
    Contract {
        /// The inner error message
        inner: String,
    },

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },
}
