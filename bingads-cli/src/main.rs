//! Bing Ads command line tool.
//!
//! Usage:
//!   bingads sync callout --file callouts.json --all-campaigns
//!   bingads pause-campaigns 123 456
//!
//! Credentials come from `bingads.json` (or `--config`) and `BINGADS_*`
//! environment variables. The refresh token is kept in `refresh.txt`.

use anyhow::Result;
use bingads_cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    bingads_cli::run(cli).await
}
