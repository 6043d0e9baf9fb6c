//! JSON-RPC client for the bundler/paymaster service

use crate::error::SenderError;
use ethers::types::Address;
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
    rpc_params,
};
use pilum_primitives::{UserOperation, UserOperationGasPrice, UserOperationHash};

/// HTTP client for the bundler's user operation endpoints
#[derive(Clone)]
pub struct BundlerClient {
    client: HttpClient,
}

impl BundlerClient {
    pub fn new(url: &str) -> Result<Self, SenderError> {
        let client = HttpClientBuilder::default()
            .build(url)
            .map_err(|e| SenderError::Bundler { inner: e.to_string() })?;
        Ok(Self { client })
    }

    /// Gas price tiers currently reported by the bundler
    pub async fn get_user_operation_gas_price(
        &self,
    ) -> Result<UserOperationGasPrice, SenderError> {
        self.client
            .request("pimlico_getUserOperationGasPrice", rpc_params![])
            .await
            .map_err(|e| SenderError::Bundler { inner: e.to_string() })
    }

    /// Submits the signed user operation; returns the bundler's operation hash
    pub async fn send_user_operation(
        &self,
        uo: &UserOperation,
        entry_point: &Address,
    ) -> Result<UserOperationHash, SenderError> {
        self.client
            .request("eth_sendUserOperation", rpc_params![uo, entry_point])
            .await
            .map_err(|e| SenderError::Bundler { inner: e.to_string() })
    }
}
