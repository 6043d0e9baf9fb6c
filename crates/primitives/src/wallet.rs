//! A `Wallet` is a wrapper around an ethers wallet that owns the signer identity for a run
use ethers::{
    prelude::k256::ecdsa::SigningKey,
    signers::{Signer, WalletError},
    types::{Address, Signature, H256},
};

/// Wrapper around ethers wallet
#[derive(Clone, Debug)]
pub struct Wallet {
    /// Signing key of the wallet
    pub signer: ethers::signers::Wallet<SigningKey>,
}

impl Wallet {
    /// Create a new wallet from the given hex-encoded private key
    ///
    /// # Arguments
    /// * `key` - The private key, with or without the `0x` prefix
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `Self` - A new `Wallet` instance
    pub fn from_key(key: &str, chain_id: u64) -> eyre::Result<Self> {
        let key = key.strip_prefix("0x").unwrap_or(key);
        let signer = key.parse::<ethers::signers::Wallet<SigningKey>>()?;
        Ok(Self { signer: signer.with_chain_id(chain_id) })
    }

    /// Address derived from the signing key
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signs the given 32-byte digest with the signing key
    ///
    /// The digest is signed as-is (typed-data style), without the personal
    /// message prefix.
    pub fn sign_digest(&self, digest: H256) -> Result<Signature, WalletError> {
        self.signer.sign_hash(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_from_key() {
        // example key from EIP-155
        let wallet = Wallet::from_key(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
            11155111,
        )
        .unwrap();
        assert_eq!(
            wallet.address(),
            "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F".parse::<Address>().unwrap()
        );

        // prefix is optional
        let wallet2 = Wallet::from_key(
            "4646464646464646464646464646464646464646464646464646464646464646",
            11155111,
        )
        .unwrap();
        assert_eq!(wallet.address(), wallet2.address());
    }

    #[test]
    fn wallet_sign_digest_deterministic() {
        let wallet = Wallet::from_key(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
            11155111,
        )
        .unwrap();
        let digest = H256::repeat_byte(0x42);
        let sig1 = wallet.sign_digest(digest).unwrap();
        let sig2 = wallet.sign_digest(digest).unwrap();
        assert_eq!(sig1, sig2);
        sig1.verify(ethers::types::RecoveryMessage::Hash(digest), wallet.address()).unwrap();
    }
}
