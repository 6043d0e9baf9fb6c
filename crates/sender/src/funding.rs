//! Funding gates: bounded balance polling in front of the pipeline

use crate::{config::PollPolicy, error::SenderError};
use ethers::types::{Address, U256};
use std::future::Future;
use tokio::time;

/// Waits until the holder's token balance reaches the threshold.
///
/// The first check is immediate; afterwards the gate sleeps exactly one
/// interval between rechecks and fails with
/// [`FundingTimeout`](SenderError::FundingTimeout) once `max_attempts`
/// rechecks came up short.
pub async fn wait_for_balance<F, Fut>(
    token: Address,
    holder: Address,
    threshold: U256,
    policy: &PollPolicy,
    mut balance_of: F,
) -> Result<U256, SenderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<U256, SenderError>>,
{
    let mut balance = balance_of().await?;
    if balance >= threshold {
        return Ok(balance);
    }

    for _ in 0..policy.max_attempts {
        time::sleep(policy.interval).await;
        balance = balance_of().await?;
        if balance >= threshold {
            return Ok(balance);
        }
    }

    Err(SenderError::FundingTimeout { token, holder, threshold })
}
