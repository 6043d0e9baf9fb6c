//! Call payload construction for the three demo transaction types

use crate::config::TxType;
use ethers::types::{Address, Bytes, U256};
use pilum_contracts::{erc20, erc721, safe};

/// Parameters of the requested call, all resolved before encoding
#[derive(Clone, Copy, Debug)]
pub struct CallParams {
    /// The counterfactual sender
    pub sender: Address,
    /// The signer, recipient of the demo transfer/mint
    pub signer: Address,
    /// Demo ERC-20 token contract
    pub erc20_token: Address,
    /// Demo ERC-721 token contract
    pub erc721_token: Address,
    /// The ERC-20 transfer amount in base units
    pub erc20_amount: U256,
}

/// Builds the operation call data for the requested transaction type.
///
/// Pure function of its inputs; every variant goes through the account's
/// 4337 module `executeUserOp`.
pub fn build_call_data(tx_type: TxType, params: &CallParams) -> Bytes {
    match tx_type {
        TxType::Account => {
            safe::execute_user_op_call_data(params.sender, U256::zero(), Bytes::default())
        }
        TxType::Erc20 => safe::execute_user_op_call_data(
            params.erc20_token,
            U256::zero(),
            erc20::transfer_call_data(params.signer, params.erc20_amount),
        ),
        TxType::Erc721 => safe::execute_user_op_call_data(
            params.erc721_token,
            U256::zero(),
            erc721::safe_mint_call_data(params.signer),
        ),
    }
}
