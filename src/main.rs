mod address_source;
mod banner;
mod bot;
mod chain;
mod cli;
mod config;
mod error;
mod prompt;
mod report;

use std::io;

use clap::Parser;
use dotenv::dotenv;
use eyre::WrapErr;
use rand::{SeedableRng, rngs::StdRng};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::address_source::AddressSource;
use crate::bot::OperationLoop;
use crate::chain::{AlloyChainClient, ChainClient};
use crate::cli::Args;
use crate::config::{RunConfig, TEA_SEPOLIA};
use crate::report::ConsoleReporter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    init_tracing();

    let args = Args::parse();

    if !args.no_banner {
        banner::show().await;
    }

    let signer = config::load_signer()?;

    let repeat_mode = match args.repeat_mode() {
        Some(mode) => mode,
        None => prompt::ask_repeat_mode(&mut io::stdin().lock(), &mut io::stdout())?,
    };
    let amount = match &args.amount {
        Some(amount) => config::parse_amount(amount),
        None => prompt::ask_amount(&mut io::stdin().lock(), &mut io::stdout())?,
    };
    let run_config = RunConfig::new(amount, repeat_mode)?;
    let timing = args.timing()?;

    let chain = AlloyChainClient::new(signer, args.rpc_url.clone());
    let mut reporter = ConsoleReporter::new(TEA_SEPOLIA);
    reporter.startup(&run_config, &chain.address());

    let source = AddressSource::new(args.address_list_url.clone(), args.fetch_timeout())?;
    info!(url = %source.url(), "fetching recipient addresses");
    reporter.fetching_addresses();
    let pool = source.load().await;
    reporter.addresses_loaded(pool.len());

    let mut bot = OperationLoop::builder()
        .client(chain)
        .reporter(reporter)
        .rng(StdRng::from_entropy())
        .pool(pool)
        .config(run_config)
        .timing(timing)
        .build()
        .wrap_err("cannot start the transfer loop")?;

    tokio::select! {
        state = bot.run() => {
            info!(transactions = state.transaction_count, "transfer loop finished");
        }
        _ = signal::ctrl_c() => {
            info!("received shutdown signal, exiting");
            report::farewell();
        }
    }

    Ok(())
}
