use pilum_sender::config::TxType;
use pin_utils::pin_mut;
use std::{future::Future, str::FromStr};
use tracing::info;

/// Parses transaction type from string
pub fn parse_tx_type(s: &str) -> Result<TxType, String> {
    TxType::from_str(s)
        .map_err(|_| format!("String {s} is not a valid transaction type (account | erc20 | erc721)"))
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();

    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let sigterm = stream.recv();
    pin_mut!(sigterm, ctrl_c, fut);

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = sigterm => {
            info!("Received SIGTERM signal.");
        },
        res = fut => res?,
    }

    Ok(())
}
