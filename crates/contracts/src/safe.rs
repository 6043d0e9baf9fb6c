//! Safe smart-account derivations: deployment init code, counterfactual
//! address and the SafeOp typed-data signature scheme of the 4337 module.

use crate::{
    erc20,
    error::SafeError,
    gen::{
        add_modules_api::EnableModulesCall, multi_send_api::MultiSendCall,
        safe_api::SetupCall, safe_module_api::ExecuteUserOpCall,
        safe_proxy_factory_api::CreateProxyWithNonceCall, SafeProxyFactoryAPI,
    },
};
use ethers::{
    abi::AbiEncode,
    prelude::{EthAbiCodec, EthAbiType},
    providers::Middleware,
    types::{Address, Bytes, H256, U256},
    utils::{get_create2_address_from_hash, keccak256},
};
use lazy_static::lazy_static;
use pilum_primitives::{UserOperation, Wallet};
use std::{collections::HashMap, ops::Deref, sync::Arc};

lazy_static! {
    /// keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")
    static ref DOMAIN_SEPARATOR_TYPEHASH: H256 = H256::from(keccak256(
        "EIP712Domain(uint256 chainId,address verifyingContract)"
    ));
    /// Type hash of the SafeOp struct verified by the 4337 module
    static ref SAFE_OP_TYPEHASH: H256 = H256::from(keccak256(
        "SafeOp(address safe,uint256 nonce,bytes initCode,bytes callData,uint256 callGasLimit,uint256 verificationGasLimit,uint256 preVerificationGas,uint256 maxFeePerGas,uint256 maxPriorityFeePerGas,bytes paymasterAndData,uint48 validAfter,uint48 validUntil,address entryPoint)"
    ));
    /// Module/factory/singleton address sets keyed by account version, then chain id
    static ref SAFE_ADDRESSES: HashMap<&'static str, HashMap<u64, SafeAddresses>> = {
        let mut sets = HashMap::new();
        sets.insert(
            11155111u64,
            SafeAddresses {
                add_modules_lib: "0x8EcD4ec46D4D2a6B64fE960B3D64e8B94B2234eb"
                    .parse()
                    .expect("valid address"),
                safe_4337_module: "0xa581c4A4DB7175302464fF3C06380BC3270b4037"
                    .parse()
                    .expect("valid address"),
                proxy_factory: "0x4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67"
                    .parse()
                    .expect("valid address"),
                singleton: "0x41675C099F32341bf84BFc5382aF534df5C7461a"
                    .parse()
                    .expect("valid address"),
            },
        );

        let mut map = HashMap::new();
        map.insert("1.4.1", sets);
        map
    };
}

/// Module/factory/singleton addresses for one (account version, chain id) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SafeAddresses {
    /// Library enabling modules during setup (delegatecalled)
    pub add_modules_lib: Address,
    /// The ERC-4337 module validating and executing user operations
    pub safe_4337_module: Address,
    /// Deterministic proxy deployment factory
    pub proxy_factory: Address,
    /// Account implementation behind the proxy
    pub singleton: Address,
}

/// Looks up the address set for the given account version and chain id
pub fn safe_addresses(version: &str, chain_id: u64) -> Result<SafeAddresses, SafeError> {
    SAFE_ADDRESSES
        .get(version)
        .and_then(|sets| sets.get(&chain_id))
        .copied()
        .ok_or(SafeError::UnknownAddressSet { version: version.into(), chain_id })
}

/// Safe transaction operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Call = 0,
    DelegateCall = 1,
}

/// One leg of a multi-send batch
#[derive(Clone, Debug)]
pub struct MetaTransaction {
    pub operation: Operation,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Packs the batch the way the multi-send contract unpacks it:
/// operation (1 byte), to (20), value (32), data length (32), data
pub fn encode_multi_send(txs: &[MetaTransaction]) -> Bytes {
    let mut packed = Vec::new();
    let mut word = [0u8; 32];
    for tx in txs {
        packed.push(tx.operation as u8);
        packed.extend_from_slice(tx.to.as_bytes());
        tx.value.to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        U256::from(tx.data.len()).to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        packed.extend_from_slice(&tx.data);
    }
    packed.into()
}

/// Descriptor of one counterfactual Safe account
///
/// Both the init code and the address derive from this one descriptor so the
/// two computations cannot drift apart.
#[derive(Clone, Debug)]
pub struct SafeAccount {
    /// Owner (the signer identity)
    pub owner: Address,
    /// Deployment salt, unrelated to the on-chain operation nonce
    pub salt_nonce: U256,
    /// Multi-send contract delegatecalled during setup
    pub multi_send: Address,
    /// Fee token the paymaster charges in
    pub fee_token: Address,
    /// The ERC-20 paymaster sponsoring the operation
    pub paymaster: Address,
    /// Module/factory/singleton addresses for the active (version, chain id)
    pub addresses: SafeAddresses,
}

impl SafeAccount {
    /// Safe `setup` calldata: single owner, the 4337 module enabled via a
    /// delegatecalled multi-send batch, the module as fallback handler, and
    /// the fee token approved for the paymaster so it can pull its fee.
    pub fn initializer(&self) -> Bytes {
        let enable_modules =
            EnableModulesCall { modules: vec![self.addresses.safe_4337_module] }.encode();

        let mut setup_txs = vec![MetaTransaction {
            operation: Operation::DelegateCall,
            to: self.addresses.add_modules_lib,
            value: U256::zero(),
            data: enable_modules.into(),
        }];

        if !self.fee_token.is_zero() && !self.paymaster.is_zero() {
            setup_txs.push(MetaTransaction {
                operation: Operation::Call,
                to: self.fee_token,
                value: U256::zero(),
                data: erc20::approve_call_data(self.paymaster, U256::MAX),
            });
        }

        let multi_send_data =
            MultiSendCall { transactions: encode_multi_send(&setup_txs) }.encode();

        SetupCall {
            owners: vec![self.owner],
            threshold: U256::one(),
            to: self.multi_send,
            data: multi_send_data.into(),
            fallback_handler: self.addresses.safe_4337_module,
            payment_token: Address::zero(),
            payment: U256::zero(),
            payment_receiver: Address::zero(),
        }
        .encode()
        .into()
    }

    /// Init code deploying the account: factory address followed by the
    /// `createProxyWithNonce` calldata
    pub fn init_code(&self) -> Bytes {
        let deploy = CreateProxyWithNonceCall {
            singleton: self.addresses.singleton,
            initializer: self.initializer(),
            salt_nonce: self.salt_nonce,
        }
        .encode();
        [self.addresses.proxy_factory.as_bytes(), deploy.as_slice()].concat().into()
    }

    /// CREATE2 address the factory will deploy the proxy at, given the
    /// factory's proxy creation code
    pub fn compute_address(&self, proxy_creation_code: &Bytes) -> Address {
        let initializer = self.initializer();
        let mut nonce_word = [0u8; 32];
        self.salt_nonce.to_big_endian(&mut nonce_word);
        let salt = keccak256(
            [keccak256(initializer.deref()).as_slice(), nonce_word.as_slice()].concat(),
        );

        let mut singleton_word = [0u8; 32];
        singleton_word[12..].copy_from_slice(self.addresses.singleton.as_bytes());
        let deployment_code = [proxy_creation_code.to_vec(), singleton_word.to_vec()].concat();

        get_create2_address_from_hash(
            self.addresses.proxy_factory,
            salt,
            keccak256(deployment_code),
        )
    }

    /// Counterfactual address of the account, without deploying it
    pub async fn counterfactual_address<M: Middleware + 'static>(
        &self,
        eth_client: Arc<M>,
    ) -> Result<Address, SafeError> {
        let factory = SafeProxyFactoryAPI::new(self.addresses.proxy_factory, eth_client);
        let creation_code = factory
            .proxy_creation_code()
            .call()
            .await
            .map_err(|e| SafeError::Provider { inner: e.to_string() })?;
        Ok(self.compute_address(&creation_code))
    }
}

/// Call data executing one call from the account through its 4337 module
pub fn execute_user_op_call_data(to: Address, value: U256, data: Bytes) -> Bytes {
    ExecuteUserOpCall { to, value, data, operation: Operation::Call as u8 }.encode().into()
}

/// EIP-712 domain of the 4337 module
#[derive(EthAbiCodec, EthAbiType)]
struct DomainSeparator {
    type_hash: H256,
    chain_id: U256,
    verifying_contract: Address,
}

/// SafeOp payload with dynamic fields pre-hashed (EIP-712 encodeData)
#[derive(EthAbiCodec, EthAbiType)]
struct SafeOperation {
    type_hash: H256,
    safe: Address,
    nonce: U256,
    init_code: H256,
    call_data: H256,
    call_gas_limit: U256,
    verification_gas_limit: U256,
    pre_verification_gas: U256,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    paymaster_and_data: H256,
    valid_after: U256,
    valid_until: U256,
    entry_point: Address,
}

/// Typed-data digest the 4337 module verifies the owner signature against
pub fn user_operation_digest(
    uo: &UserOperation,
    module: &Address,
    chain_id: u64,
    entry_point: &Address,
    valid_after: u64,
    valid_until: u64,
) -> H256 {
    let domain = DomainSeparator {
        type_hash: *DOMAIN_SEPARATOR_TYPEHASH,
        chain_id: chain_id.into(),
        verifying_contract: *module,
    };
    let domain_hash = keccak256(domain.encode());

    let safe_op = SafeOperation {
        type_hash: *SAFE_OP_TYPEHASH,
        safe: uo.sender,
        nonce: uo.nonce,
        init_code: keccak256(uo.init_code.deref()).into(),
        call_data: keccak256(uo.call_data.deref()).into(),
        call_gas_limit: uo.call_gas_limit,
        verification_gas_limit: uo.verification_gas_limit,
        pre_verification_gas: uo.pre_verification_gas,
        max_fee_per_gas: uo.max_fee_per_gas,
        max_priority_fee_per_gas: uo.max_priority_fee_per_gas,
        paymaster_and_data: keccak256(uo.paymaster_and_data.deref()).into(),
        valid_after: valid_after.into(),
        valid_until: valid_until.into(),
        entry_point: *entry_point,
    };
    let struct_hash = keccak256(safe_op.encode());

    H256::from(keccak256(
        [[0x19u8, 0x01u8].as_slice(), domain_hash.as_slice(), struct_hash.as_slice()].concat(),
    ))
}

/// Signs the user operation with the module's typed-data scheme
///
/// The signature is packed as validAfter (6 bytes), validUntil (6 bytes) and
/// the owner's 65-byte ECDSA signature; the validity window is left open.
pub fn sign_user_operation(
    uo: &UserOperation,
    wallet: &Wallet,
    module: &Address,
    chain_id: u64,
    entry_point: &Address,
) -> Result<UserOperation, SafeError> {
    let (valid_after, valid_until) = (0u64, 0u64);
    let digest = user_operation_digest(uo, module, chain_id, entry_point, valid_after, valid_until);
    let sig =
        wallet.sign_digest(digest).map_err(|e| SafeError::Signer { inner: e.to_string() })?;

    let mut packed = Vec::with_capacity(12 + 65);
    packed.extend_from_slice(&valid_after.to_be_bytes()[2..8]);
    packed.extend_from_slice(&valid_until.to_be_bytes()[2..8]);
    packed.extend_from_slice(&sig.to_vec());

    Ok(UserOperation { signature: packed.into(), ..uo.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> SafeAccount {
        SafeAccount {
            owner: "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F".parse().unwrap(),
            salt_nonce: 7.into(),
            multi_send: "0x38869bf66a61cF6bDB996A6aE40D5853Fd43B526".parse().unwrap(),
            fee_token: "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238".parse().unwrap(),
            paymaster: "0x0000000000325602a77416A16136FDafd04b299f".parse().unwrap(),
            addresses: safe_addresses("1.4.1", 11155111).unwrap(),
        }
    }

    // stand-in for the factory's proxy creation code
    fn creation_code() -> Bytes {
        "0x608060405234801561001057600080fd5b50604051610120380380610120833981016040819052"
            .parse()
            .unwrap()
    }

    #[test]
    fn address_set_lookup() {
        assert!(safe_addresses("1.4.1", 11155111).is_ok());

        assert!(matches!(
            safe_addresses("1.4.1", 1),
            Err(SafeError::UnknownAddressSet { chain_id: 1, .. })
        ));
        assert!(matches!(
            safe_addresses("1.3.0", 11155111),
            Err(SafeError::UnknownAddressSet { .. })
        ));
    }

    #[test]
    fn init_code_deterministic() {
        let account = account();
        assert_eq!(account.init_code(), account.init_code());
    }

    #[test]
    fn init_code_embeds_factory_and_initializer() {
        let account = account();
        let init_code = account.init_code();
        let initializer = account.initializer();

        assert_eq!(&init_code[..20], account.addresses.proxy_factory.as_bytes());
        assert!(init_code
            .windows(initializer.len())
            .any(|window| window == initializer.deref()));
    }

    #[test]
    fn compute_address_deterministic() {
        let account = account();
        let code = creation_code();
        assert_eq!(account.compute_address(&code), account.compute_address(&code));
    }

    #[test]
    fn compute_address_depends_on_descriptor() {
        let account = account();
        let code = creation_code();
        let address = account.compute_address(&code);

        let mut other_salt = account.clone();
        other_salt.salt_nonce = 8.into();
        assert_ne!(address, other_salt.compute_address(&code));

        let mut other_owner = account.clone();
        other_owner.owner = Address::random();
        assert_ne!(address, other_owner.compute_address(&code));
    }

    #[test]
    fn initializer_skips_approval_without_paymaster() {
        let account = account();
        let mut no_paymaster = account.clone();
        no_paymaster.paymaster = Address::zero();

        let with_approval = account.initializer();
        let without_approval = no_paymaster.initializer();
        assert!(with_approval.len() > without_approval.len());
    }

    #[test]
    fn multi_send_packing() {
        let txs = vec![MetaTransaction {
            operation: Operation::DelegateCall,
            to: Address::random(),
            value: U256::zero(),
            data: "0x11223344".parse().unwrap(),
        }];
        let packed = encode_multi_send(&txs);
        assert_eq!(packed.len(), 1 + 20 + 32 + 32 + 4);
        assert_eq!(packed[0], Operation::DelegateCall as u8);
        assert_eq!(&packed[1..21], txs[0].to.as_bytes());
        assert_eq!(packed[52], 0);
        assert_eq!(packed[84], 4);
    }

    #[test]
    fn execute_user_op_encoding() {
        let to = Address::random();
        let data: Bytes = "0xa9059cbb".parse().unwrap();
        let call_data = execute_user_op_call_data(to, U256::zero(), data.clone());
        assert_eq!(call_data, execute_user_op_call_data(to, U256::zero(), data));

        let selector = &keccak256("executeUserOp(address,uint256,bytes,uint8)")[0..4];
        assert_eq!(&call_data[0..4], selector);
    }

    #[test]
    fn digest_depends_on_module_and_chain() {
        let uo = UserOperation::default()
            .sender("0x9c5754De1443984659E1b3a8d1931D83475ba29C".parse().unwrap())
            .verification_gas_limit(100_000.into())
            .pre_verification_gas(21_000.into())
            .max_priority_fee_per_gas(1_000_000_000.into());
        let module: Address = "0xa581c4A4DB7175302464fF3C06380BC3270b4037".parse().unwrap();
        let entry_point: Address =
            "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse().unwrap();

        let digest = user_operation_digest(&uo, &module, 11155111, &entry_point, 0, 0);
        assert_eq!(digest, user_operation_digest(&uo, &module, 11155111, &entry_point, 0, 0));
        assert_ne!(digest, user_operation_digest(&uo, &module, 1, &entry_point, 0, 0));
        assert_ne!(
            digest,
            user_operation_digest(&uo, &entry_point, 11155111, &entry_point, 0, 0)
        );
    }

    #[test]
    fn sign_user_operation_packs_validity_window() {
        let wallet = Wallet::from_key(
            "0x4646464646464646464646464646464646464646464646464646464646464646",
            11155111,
        )
        .unwrap();
        let uo = UserOperation::default().sender(wallet.address());
        let module: Address = "0xa581c4A4DB7175302464fF3C06380BC3270b4037".parse().unwrap();
        let entry_point: Address =
            "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".parse().unwrap();

        let signed = sign_user_operation(&uo, &wallet, &module, 11155111, &entry_point).unwrap();
        assert_eq!(signed.signature.len(), 12 + 65);
        assert_eq!(&signed.signature[0..12], &[0u8; 12]);
        // everything but the signature stays untouched
        assert_eq!(signed.clone().signature(Bytes::default()), uo);
    }
}
