//! ERC-20 helpers: pure calldata builders and thin read/mint wrappers

use crate::{
    error::TokenError,
    gen::{
        token_api::{ApproveCall, MintCall, TransferCall},
        TokenAPI,
    },
};
use ethers::{
    abi::AbiEncode,
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use std::sync::Arc;

/// Calldata for `transfer(to, amount)`
pub fn transfer_call_data(to: Address, amount: U256) -> Bytes {
    TransferCall { to, amount }.encode().into()
}

/// Calldata for `approve(spender, amount)`
pub fn approve_call_data(spender: Address, amount: U256) -> Bytes {
    ApproveCall { spender, amount }.encode().into()
}

/// Calldata for `mint(to, amount)`
pub fn mint_call_data(to: Address, amount: U256) -> Bytes {
    MintCall { to, amount }.encode().into()
}

/// Reads the token decimals
pub async fn decimals<M: Middleware + 'static>(
    token: Address,
    eth_client: Arc<M>,
) -> Result<u8, TokenError> {
    TokenAPI::new(token, eth_client)
        .decimals()
        .call()
        .await
        .map_err(|e| TokenError::Contract { inner: e.to_string() })
}

/// Reads the token balance of the holder
pub async fn balance_of<M: Middleware + 'static>(
    token: Address,
    eth_client: Arc<M>,
    holder: Address,
) -> Result<U256, TokenError> {
    TokenAPI::new(token, eth_client)
        .balance_of(holder)
        .call()
        .await
        .map_err(|e| TokenError::Contract { inner: e.to_string() })
}

/// Sends a mint transaction and waits for it to be mined; the token contract
/// must be publicly mintable
pub async fn mint<M: Middleware + 'static>(
    token: Address,
    eth_client: Arc<M>,
    to: Address,
    amount: U256,
) -> Result<(), TokenError> {
    TokenAPI::new(token, eth_client)
        .mint(to, amount)
        .send()
        .await
        .map_err(|e| TokenError::Contract { inner: e.to_string() })?
        .await
        .map_err(|e| TokenError::Provider { inner: e.to_string() })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_encoding() {
        let to: Address = "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F".parse().unwrap();
        let data = transfer_call_data(to, U256::exp10(6));
        assert_eq!(data, transfer_call_data(to, U256::exp10(6)));
        assert_eq!(&data[0..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 4 + 32 + 32);
    }

    #[test]
    fn approve_encoding() {
        let spender = Address::random();
        let data = approve_call_data(spender, U256::MAX);
        assert_eq!(&data[0..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(&data[36..68], &[0xff; 32]);
    }

    #[test]
    fn mint_encoding() {
        let data = mint_call_data(Address::random(), U256::exp10(18));
        assert_eq!(&data[0..4], &[0x40, 0xc1, 0x0f, 0x19]);
    }
}
