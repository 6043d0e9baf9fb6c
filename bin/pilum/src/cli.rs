use crate::utils::{parse_tx_type, run_until_ctrl_c};
use clap::{value_parser, Parser};
use pilum_sender::{
    config::{Config, TxType},
    pipeline,
};

/// The main Pilum CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Pilum", long_about = None)]
pub struct Cli {
    /// The demo transaction type to execute
    #[clap(value_parser = parse_tx_type)]
    tx_type: TxType,

    /// The verbosity level
    #[clap(long, short, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let level = cli.get_log_level();
    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},pilum={level},pilum_sender={level}"),
        Err(_) => format!("pilum={level},pilum_sender={level}"),
    };
    std::env::set_var("RUST_LOG", rust_log);
    tracing_subscriber::fmt::init();

    dotenv::dotenv().ok();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    rt.block_on(run_until_ctrl_c(execute(cli.tx_type)))?;
    Ok(())
}

async fn execute(tx_type: TxType) -> eyre::Result<()> {
    let config = Config::from_env(tx_type)?;
    pipeline::run(&config).await?;
    Ok(())
}
