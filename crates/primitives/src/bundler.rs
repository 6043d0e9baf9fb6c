//! Bundler-related primitives

use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Fee pair for one gas price tier
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFee {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

/// Gas price tiers reported by the bundler (pimlico_getUserOperationGasPrice)
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct UserOperationGasPrice {
    pub slow: GasFee,
    pub standard: GasFee,
    pub fast: GasFee,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_price_deserialize() {
        let res: UserOperationGasPrice = serde_json::from_str(
            r#"{
                "slow": {"maxFeePerGas": "0x3b9aca00", "maxPriorityFeePerGas": "0x3b9aca00"},
                "standard": {"maxFeePerGas": "0x77359400", "maxPriorityFeePerGas": "0x3b9aca00"},
                "fast": {"maxFeePerGas": "0xb2d05e00", "maxPriorityFeePerGas": "0x77359400"}
            }"#,
        )
        .unwrap();
        assert_eq!(res.fast.max_fee_per_gas, U256::from(3_000_000_000_u64));
        assert_eq!(res.fast.max_priority_fee_per_gas, U256::from(2_000_000_000_u64));
        assert_eq!(res.slow.max_fee_per_gas, U256::from(1_000_000_000_u64));
    }
}
