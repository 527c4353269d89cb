use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use stock_cli::api::TwelveDataClient;
use stock_cli::cli::Cli;
use stock_cli::commands;
use stock_cli::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load().context("could not load configuration")?;
    let client = TwelveDataClient::new(&settings).context("could not build API client")?;

    if let Err(err) = commands::run(cli, &client).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
