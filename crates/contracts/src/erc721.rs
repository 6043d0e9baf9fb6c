//! ERC-721 helpers

use crate::gen::nft_api::SafeMintCall;
use ethers::{
    abi::AbiEncode,
    types::{Address, Bytes},
};

/// Calldata for `safeMint(to)`
pub fn safe_mint_call_data(to: Address) -> Bytes {
    SafeMintCall { to }.encode().into()
}
