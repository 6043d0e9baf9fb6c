pub use super::{error::EntryPointError, gen::EntryPointAPI};
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;

/// Wrapper around the entry point smart contract
#[derive(Clone)]
pub struct EntryPoint<M: Middleware + 'static> {
    address: Address,
    entry_point_api: EntryPointAPI<M>,
}

impl<M: Middleware + 'static> EntryPoint<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        let entry_point_api = EntryPointAPI::new(address, eth_client);
        Self { address, entry_point_api }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// On-chain user operation nonce of the sender (key 0 unless the account
    /// uses parallel nonces)
    pub async fn get_nonce(&self, address: &Address, key: U256) -> Result<U256, EntryPointError> {
        let res = self.entry_point_api.get_nonce(*address, key).call().await;

        match res {
            Ok(nonce) => Ok(nonce),
            Err(err) => Err(EntryPointError::Other { inner: format!("get nonce error: {err:?}") }),
        }
    }
}
