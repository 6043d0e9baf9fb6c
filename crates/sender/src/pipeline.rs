//! The single-pass pipeline from resolved configuration to submitted user
//! operation. Any failure is fatal; only the funding gates retry.

use crate::{
    bundler::BundlerClient,
    calldata::{build_call_data, CallParams},
    config::{Config, TxType},
    error::SenderError,
    funding,
};
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    types::{Address, Bytes, U256},
    utils::to_checksum,
};
use pilum_contracts::{erc20, safe, EntryPoint};
use pilum_primitives::{
    constants, provider::create_http_provider, UserOperation, UserOperationHash, Wallet,
};
use std::sync::Arc;
use tracing::info;

/// Terminal state of a successful run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The account already exists and nothing beyond deployment was requested
    AlreadyDeployed,
    /// The operation was accepted by the bundler
    Submitted(UserOperationHash),
}

/// Runs the full pipeline for one configured demo transaction
pub async fn run(config: &Config) -> Result<RunOutcome, SenderError> {
    let wallet = Wallet::from_key(&config.private_key, config.chain_id)
        .map_err(|e| SenderError::Wallet { inner: e.to_string() })?;
    info!("Signer extracted from private key: {}", to_checksum(&wallet.address(), None));

    let eth_client = Arc::new(
        create_http_provider(&config.node_rpc_url)
            .await
            .map_err(|e| SenderError::Provider { inner: e.to_string() })?,
    );
    let bundler = BundlerClient::new(&config.bundler_url())?;
    let entry_point = EntryPoint::new(eth_client.clone(), config.entry_point);

    let account = safe::SafeAccount {
        owner: wallet.address(),
        salt_nonce: config.salt_nonce,
        multi_send: config.multi_send,
        fee_token: config.fee_token,
        paymaster: config.paymaster,
        addresses: safe::safe_addresses(&config.account_version, config.chain_id)?,
    };
    let init_code = account.init_code();
    info!("Init code created");

    let sender = account.counterfactual_address(eth_client.clone()).await?;
    info!("Counterfactual sender address: {}", to_checksum(&sender, None));
    info!(
        "Address link: https://{}.{}/address/{}",
        config.chain,
        constants::explorer::DOMAIN,
        to_checksum(&sender, None)
    );

    let code = eth_client
        .get_code(sender, None)
        .await
        .map_err(|e| SenderError::Provider { inner: e.to_string() })?;
    if code.is_empty() {
        info!("Deploying a new account and executing the requested call with it");
    } else {
        info!("The account is already deployed");
        if should_exit_early(config.tx_type, &code) {
            return Ok(RunOutcome::AlreadyDeployed);
        }
    }

    wait_for_fee_token(config, eth_client.clone(), sender).await?;

    let call_data = build_demo_call_data(config, &wallet, eth_client.clone(), sender).await?;

    let nonce = entry_point.get_nonce(&sender, U256::zero()).await?;
    info!("Nonce for the sender received from entry point");

    let gas_price = bundler.get_user_operation_gas_price().await?;

    let uo = UserOperation::default()
        .sender(sender)
        .nonce(nonce)
        .init_code(resolve_init_code(&code, init_code))
        .call_data(call_data)
        .call_gas_limit(config.gas.call_gas_limit)
        .verification_gas_limit(config.gas.verification_gas_limit)
        .pre_verification_gas(config.gas.pre_verification_gas)
        .max_fee_per_gas(gas_price.fast.max_fee_per_gas)
        .max_priority_fee_per_gas(gas_price.fast.max_priority_fee_per_gas)
        .paymaster_and_data(config.paymaster.as_bytes().to_vec().into());

    let uo = safe::sign_user_operation(
        &uo,
        &wallet,
        &account.addresses.safe_4337_module,
        config.chain_id,
        &entry_point.address(),
    )?;

    let hash = bundler.send_user_operation(&uo, &entry_point.address()).await?;
    info!(
        "User operation submitted: bundler hash {:?}, entry point hash {:?}",
        hash.0,
        uo.hash(&entry_point.address(), &config.chain_id.into()).0
    );

    Ok(RunOutcome::Submitted(hash))
}

/// Blocks until the account holds enough of the fee token to pay the
/// paymaster, prompting for a deposit while below the threshold
async fn wait_for_fee_token(
    config: &Config,
    eth_client: Arc<Provider<Http>>,
    sender: Address,
) -> Result<(), SenderError> {
    let decimals = erc20::decimals(config.fee_token, eth_client.clone()).await?;
    let unit = U256::exp10(decimals as usize);
    let threshold = unit * U256::from(config.fee_funding.threshold);

    let balance = erc20::balance_of(config.fee_token, eth_client.clone(), sender).await?;
    info!("Account fee token balance: {}", balance / unit);
    if balance >= threshold {
        return Ok(());
    }

    info!(
        "Please deposit at least {} fee token(s) for paying the paymaster",
        config.fee_funding.threshold
    );
    let balance = funding::wait_for_balance(
        config.fee_token,
        sender,
        threshold,
        &config.fee_funding,
        || token_balance(config.fee_token, eth_client.clone(), sender),
    )
    .await?;
    info!("Updated account fee token balance: {}", balance / unit);
    Ok(())
}

/// Resolves the scenario parameters and encodes the call payload; the ERC-20
/// variant first funds the account with the demo token, minting at most once
async fn build_demo_call_data(
    config: &Config,
    wallet: &Wallet,
    eth_client: Arc<Provider<Http>>,
    sender: Address,
) -> Result<Bytes, SenderError> {
    let mut params = CallParams {
        sender,
        signer: wallet.address(),
        erc20_token: config.erc20_token,
        erc721_token: config.erc721_token,
        erc20_amount: U256::zero(),
    };

    if config.tx_type == TxType::Erc20 {
        let decimals = erc20::decimals(config.erc20_token, eth_client.clone()).await?;
        let unit = U256::exp10(decimals as usize);
        let amount = unit * U256::from(config.token_funding.threshold);

        let balance = erc20::balance_of(config.erc20_token, eth_client.clone(), sender).await?;
        info!("Account demo token balance: {}", balance / unit);

        if balance < amount {
            // the demo token must be publicly mintable
            info!("Minting demo tokens to the account");
            let minter = Arc::new(SignerMiddleware::new(
                eth_client.as_ref().clone(),
                wallet.signer.clone(),
            ));
            erc20::mint(config.erc20_token, minter, sender, amount).await?;

            let balance = funding::wait_for_balance(
                config.erc20_token,
                sender,
                amount,
                &config.token_funding,
                || token_balance(config.erc20_token, eth_client.clone(), sender),
            )
            .await?;
            info!("Updated account demo token balance: {}", balance / unit);
        }

        // send one whole token back to the signer
        params.erc20_amount = unit;
    }

    Ok(build_call_data(config.tx_type, &params))
}

async fn token_balance(
    token: Address,
    eth_client: Arc<Provider<Http>>,
    holder: Address,
) -> Result<U256, SenderError> {
    erc20::balance_of(token, eth_client, holder).await.map_err(SenderError::from)
}

/// The run is complete before assembling any operation when deployment was
/// the only thing requested and the sender already has bytecode
fn should_exit_early(tx_type: TxType, code: &Bytes) -> bool {
    tx_type == TxType::Account && !code.is_empty()
}

/// Empty init code once the sender has bytecode, the derived one otherwise
fn resolve_init_code(code: &Bytes, init_code: Bytes) -> Bytes {
    if code.is_empty() {
        init_code
    } else {
        Bytes::default()
    }
}
