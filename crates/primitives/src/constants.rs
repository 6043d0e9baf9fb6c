//! Account abstraction (ERC-4337)-related constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
    /// Version of the entry point smart contract
    pub const VERSION: &str = "0.6.0";
}

/// Gas limits used when assembling user operations
///
/// Provisional high values, not derived from call simulation.
pub mod gas {
    pub const CALL_GAS_LIMIT: u64 = 100_000;
    pub const VERIFICATION_GAS_LIMIT: u64 = 500_000;
    pub const PRE_VERIFICATION_GAS: u64 = 50_000;
}

/// Funding gate polling
pub mod funding {
    /// Poll interval while waiting for the fee token deposit (in seconds)
    pub const FEE_TOKEN_POLL_INTERVAL: u64 = 30;
    /// Poll interval while waiting for the demo token mint (in seconds)
    pub const TOKEN_POLL_INTERVAL: u64 = 15;
    /// Maximum number of polls before the gate gives up
    pub const MAX_POLL_ATTEMPTS: u32 = 40;
    /// Whole fee tokens required before the paymaster can be used
    pub const FEE_TOKEN_THRESHOLD: u64 = 1;
    /// Whole demo tokens required for the ERC-20 transfer
    pub const TOKEN_THRESHOLD: u64 = 1;
}

/// Bundler/paymaster service
pub mod bundler {
    /// Base URL of the bundler JSON-RPC API
    pub const API_URL: &str = "https://api.pimlico.io/v1";
}

/// Block explorer
pub mod explorer {
    /// Domain of the block explorer, prefixed with the chain name per network
    pub const DOMAIN: &str = "etherscan.io";
}

/// Supported chains
pub mod supported_chains {
    use alloy_chains::NamedChain;

    pub const CHAINS: [NamedChain; 1] = [NamedChain::Sepolia];
}
