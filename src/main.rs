use std::sync::Arc;

use alloy::primitives::{utils::format_ether, Address};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use price_relay::config::{Config, DeployConfig};
use price_relay::services::{
    deployment, EvmChain, OracleClient, PriceMonitor, PriceRelay,
};

/// Push the latest oracle price to a consumer contract
#[derive(Debug, Parser)]
#[command(name = "price-relay", version, about)]
struct Cli {
    /// What to run; defaults to `submit`
    #[arg(value_enum)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Command {
    /// Print the consumer contract's constructor arguments
    Deploy,
    /// Fetch the latest price update and submit it on-chain
    Submit,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file first
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "price_relay=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Submit) {
        Command::Deploy => deploy(),
        Command::Submit => submit().await,
    }
}

fn deploy() -> Result<()> {
    let config = DeployConfig::from_env();
    let plan = deployment::plan(&config.pyth_contract_address)?;

    println!("Contract deployment is not automated by this tool.");
    println!("Compile and deploy the consumer contract with your own toolchain, then set CONTRACT_ADDRESS.");
    println!("  Constructor:    {}", plan.constructor);
    println!("  Oracle address: {}", plan.oracle);
    println!("  Encoded args:   {}", plan.encoded_args);
    Ok(())
}

async fn submit() -> Result<()> {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            error!("Set RPC_URL, PRIVATE_KEY and CONTRACT_ADDRESS in the environment or .env");
            std::process::exit(1);
        }
    };

    let oracle_contract: Address = config
        .pyth_contract_address
        .parse()
        .context("PYTH_CONTRACT_ADDRESS is not a valid address")?;
    let consumer_contract: Address = config
        .contract_address
        .parse()
        .context("CONTRACT_ADDRESS is not a valid address")?;

    let chain = Arc::new(EvmChain::connect(&config.rpc_url, &config.private_key)?);
    let oracle = OracleClient::new(
        &config.hermes_url,
        config.oracle_strategy,
        config.request_timeout(),
    )?;
    info!(
        "Oracle client initialized ({} strategy, {})",
        config.oracle_strategy, config.hermes_url
    );

    let relay = PriceRelay::new(
        oracle.clone(),
        chain,
        oracle_contract,
        consumer_contract,
        config.gas_limit,
        config.price_feed_id.clone(),
    );
    let outcome = relay.run().await?;

    println!("Price update submitted");
    println!("  Feed:      {}", outcome.update.observation.feed_id);
    println!("  Price:     {}", outcome.update.observation.decoded_price());
    println!("  Source:    {}", outcome.update.source);
    println!("  Fee paid:  {} ETH", format_ether(outcome.fee));
    println!("  Tx:        {}", outcome.receipt);

    if config.monitor.enabled {
        let monitor = PriceMonitor::new(oracle, config.price_feed_id, config.monitor.into());
        let report = monitor.run().await;
        println!(
            "Monitor collected {} samples ({} failed polls)",
            report.samples.len(),
            report.failed_polls
        );
    }

    Ok(())
}
