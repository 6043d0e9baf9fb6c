//! Immutable run configuration, resolved once at startup and passed into the
//! pipeline; no component reads the process environment afterwards.

use crate::error::ConfigError;
use alloy_chains::NamedChain;
use ethers::types::{Address, U256};
use pilum_primitives::constants;
use std::{collections::HashMap, str::FromStr, time::Duration};
use strum_macros::{EnumString, EnumVariantNames};

/// Demo transaction type executed by the run
#[derive(Clone, Copy, Debug, EnumString, EnumVariantNames, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum TxType {
    /// Deploy the account with a no-op self call
    Account,
    /// Transfer one demo ERC-20 token to the signer
    Erc20,
    /// Mint a demo ERC-721 token to the signer
    Erc721,
}

/// Gas limits applied to the assembled operation
///
/// Provisional values, not derived from call simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasConfig {
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            call_gas_limit: constants::gas::CALL_GAS_LIMIT.into(),
            verification_gas_limit: constants::gas::VERIFICATION_GAS_LIMIT.into(),
            pre_verification_gas: constants::gas::PRE_VERIFICATION_GAS.into(),
        }
    }
}

/// Polling discipline of one funding gate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Whole tokens required before the gate opens
    pub threshold: u64,
    /// Wait between balance checks
    pub interval: Duration,
    /// Rechecks after the first before giving up
    pub max_attempts: u32,
}

/// Immutable configuration of one run
#[derive(Clone, Debug)]
pub struct Config {
    pub tx_type: TxType,
    pub private_key: String,
    pub entry_point: Address,
    pub multi_send: Address,
    pub salt_nonce: U256,
    pub chain: NamedChain,
    pub chain_id: u64,
    pub account_version: String,
    pub node_rpc_url: String,
    pub bundler_api_key: String,
    pub paymaster: Address,
    pub fee_token: Address,
    pub erc20_token: Address,
    pub erc721_token: Address,
    pub gas: GasConfig,
    pub fee_funding: PollPolicy,
    pub token_funding: PollPolicy,
}

impl Config {
    /// Reads and validates the full configuration from the process
    /// environment; all-or-nothing, before any network call is made
    pub fn from_env(tx_type: TxType) -> Result<Self, ConfigError> {
        Self::from_vars(tx_type, &std::env::vars().collect())
    }

    /// Builds the configuration from the given variables
    pub fn from_vars(
        tx_type: TxType,
        vars: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let private_key = require(vars, "PRIVATE_KEY")?;
        validate_private_key("PRIVATE_KEY", &private_key)?;
        let entry_point = parse_address(vars, "ENTRY_POINT_ADDRESS")?;
        let multi_send = parse_address(vars, "MULTI_SEND_ADDRESS")?;
        let salt_nonce = parse_u256(vars, "SALT_NONCE")?;

        let chain_name = require(vars, "CHAIN")?;
        let chain = NamedChain::from_str(&chain_name)
            .ok()
            .filter(|chain| constants::supported_chains::CHAINS.contains(chain))
            .ok_or_else(|| ConfigError::UnsupportedChain(chain_name.clone()))?;
        let chain_id = parse_u64(vars, "CHAIN_ID")?;
        if chain_id != chain as u64 {
            return Err(ConfigError::ChainIdMismatch { chain: chain_name, chain_id });
        }

        let account_version = require(vars, "ACCOUNT_VERSION")?;
        let node_rpc_url = require(vars, "NODE_RPC_URL")?;
        let bundler_api_key = require(vars, "BUNDLER_API_KEY")?;
        let paymaster = parse_address(vars, "ERC20_PAYMASTER_ADDRESS")?;
        let fee_token = parse_address(vars, "FEE_TOKEN_ADDRESS")?;
        let erc20_token = parse_address(vars, "ERC20_TOKEN_ADDRESS")?;
        let erc721_token = parse_address(vars, "ERC721_TOKEN_ADDRESS")?;

        Ok(Self {
            tx_type,
            private_key,
            entry_point,
            multi_send,
            salt_nonce,
            chain,
            chain_id,
            account_version,
            node_rpc_url,
            bundler_api_key,
            paymaster,
            fee_token,
            erc20_token,
            erc721_token,
            gas: GasConfig::default(),
            fee_funding: PollPolicy {
                threshold: constants::funding::FEE_TOKEN_THRESHOLD,
                interval: Duration::from_secs(constants::funding::FEE_TOKEN_POLL_INTERVAL),
                max_attempts: constants::funding::MAX_POLL_ATTEMPTS,
            },
            token_funding: PollPolicy {
                threshold: constants::funding::TOKEN_THRESHOLD,
                interval: Duration::from_secs(constants::funding::TOKEN_POLL_INTERVAL),
                max_attempts: constants::funding::MAX_POLL_ATTEMPTS,
            },
        })
    }

    /// URL of the bundler RPC endpoint for the configured chain
    pub fn bundler_url(&self) -> String {
        format!(
            "{}/{}/rpc?apikey={}",
            constants::bundler::API_URL,
            self.chain,
            self.bundler_api_key
        )
    }
}

fn require(vars: &HashMap<String, String>, name: &'static str) -> Result<String, ConfigError> {
    match vars.get(name) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_address(
    vars: &HashMap<String, String>,
    name: &'static str,
) -> Result<Address, ConfigError> {
    let value = require(vars, name)?;
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("{value} is not a valid address"),
    })
}

fn parse_u256(vars: &HashMap<String, String>, name: &'static str) -> Result<U256, ConfigError> {
    let value = require(vars, name)?;
    U256::from_str_radix(&value, 10).map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("{value} is not a valid U256"),
    })
}

fn parse_u64(vars: &HashMap<String, String>, name: &'static str) -> Result<u64, ConfigError> {
    let value = require(vars, name)?;
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("{value} is not a valid u64"),
    })
}

fn validate_private_key(name: &'static str, key: &str) -> Result<(), ConfigError> {
    let hex = key.strip_prefix("0x").unwrap_or(key);
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::Invalid {
            name,
            reason: "not a 32-byte hex string".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> HashMap<String, String> {
        [
            (
                "PRIVATE_KEY",
                "0x4646464646464646464646464646464646464646464646464646464646464646",
            ),
            ("ENTRY_POINT_ADDRESS", "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789"),
            ("MULTI_SEND_ADDRESS", "0x38869bf66a61cF6bDB996A6aE40D5853Fd43B526"),
            ("SALT_NONCE", "7"),
            ("CHAIN", "sepolia"),
            ("CHAIN_ID", "11155111"),
            ("ACCOUNT_VERSION", "1.4.1"),
            ("NODE_RPC_URL", "https://rpc.sepolia.org"),
            ("BUNDLER_API_KEY", "test-api-key"),
            ("ERC20_PAYMASTER_ADDRESS", "0x0000000000325602a77416A16136FDafd04b299f"),
            ("FEE_TOKEN_ADDRESS", "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
            ("ERC20_TOKEN_ADDRESS", "0xAF7868a9BB72E16B930D50636519038d7F057470"),
            ("ERC721_TOKEN_ADDRESS", "0xBdE1EAE59cE082505bB73fedBa56252b1b9C60Ce"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn tx_type_parse() {
        assert_eq!(TxType::from_str("account").unwrap(), TxType::Account);
        assert_eq!(TxType::from_str("erc20").unwrap(), TxType::Erc20);
        assert_eq!(TxType::from_str("erc721").unwrap(), TxType::Erc721);
        assert!(TxType::from_str("eth").is_err());
        assert!(TxType::from_str("").is_err());
    }

    #[test]
    fn full_config_resolves() {
        let config = Config::from_vars(TxType::Erc20, &vars()).unwrap();
        assert_eq!(config.chain, NamedChain::Sepolia);
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.salt_nonce, U256::from(7));
        assert_eq!(
            config.bundler_url(),
            "https://api.pimlico.io/v1/sepolia/rpc?apikey=test-api-key"
        );
        assert_eq!(config.gas, GasConfig::default());
        assert_eq!(config.fee_funding.interval, Duration::from_secs(30));
        assert_eq!(config.token_funding.interval, Duration::from_secs(15));
    }

    #[test]
    fn missing_variable_is_rejected() {
        let mut vars = vars();
        vars.remove("BUNDLER_API_KEY");
        assert_eq!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::Missing("BUNDLER_API_KEY")
        );

        let mut vars = self::vars();
        vars.insert("PRIVATE_KEY".into(), String::new());
        assert_eq!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::Missing("PRIVATE_KEY")
        );
    }

    #[test]
    fn unsupported_chain_is_rejected() {
        let mut vars = vars();
        vars.insert("CHAIN".into(), "mainnet".into());
        vars.insert("CHAIN_ID".into(), "1".into());
        assert_eq!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::UnsupportedChain("mainnet".into())
        );

        let mut vars = self::vars();
        vars.insert("CHAIN".into(), "notachain".into());
        assert!(matches!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::UnsupportedChain(_)
        ));
    }

    #[test]
    fn chain_id_mismatch_is_rejected() {
        let mut vars = vars();
        vars.insert("CHAIN_ID".into(), "1".into());
        assert_eq!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::ChainIdMismatch { chain: "sepolia".into(), chain_id: 1 }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut vars = vars();
        vars.insert("ENTRY_POINT_ADDRESS".into(), "0x1234".into());
        assert!(matches!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::Invalid { name: "ENTRY_POINT_ADDRESS", .. }
        ));

        let mut vars = self::vars();
        vars.insert("PRIVATE_KEY".into(), "0xzz46".into());
        assert!(matches!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::Invalid { name: "PRIVATE_KEY", .. }
        ));

        let mut vars = self::vars();
        vars.insert("SALT_NONCE".into(), "0x7".into());
        assert!(matches!(
            Config::from_vars(TxType::Account, &vars).unwrap_err(),
            ConfigError::Invalid { name: "SALT_NONCE", .. }
        ));
    }
}
