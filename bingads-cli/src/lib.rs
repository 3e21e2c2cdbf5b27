//! Command line front end for the Bing Ads sync layer.
//!
//! [`run`] builds a [`Session`] from the config file and environment and
//! dispatches to [`execute`], which works against any remote implementing
//! the sync collaborator traits.

mod cli;
mod commands;
mod config;
mod desired;

pub use cli::{CampaignSelection, Cli, Command, ConfigArgs};
pub use commands::execute;
pub use config::{load_config, DEFAULT_CONFIG_FILE};
pub use desired::{load_desired, parse_desired};

use anyhow::{Context, Result};
use bingads_client::{BingAdsClient, FileTokenStore, Session};
use std::io::Write;
use std::sync::Arc;

/// Runs a parsed command line against the live service.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let token_store = Arc::new(FileTokenStore::new(cli.config.token_file.clone()));
    let session = Session::new(config, token_store).context("Failed to create session")?;
    let client = Arc::new(BingAdsClient::new(Arc::new(session)));
    let mut stdout = std::io::stdout();

    if let Command::WhoAmI = cli.command {
        let user_id = client
            .current_user_id()
            .await
            .context("Failed to look up the current user")?;
        writeln!(stdout, "{user_id}")?;
        return Ok(());
    }

    execute(cli.command, client, &mut stdout).await
}
