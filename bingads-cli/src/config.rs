//! Config file loading.

use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use bingads_client::ClientConfig;
use tracing::{debug, warn};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "bingads.json";

/// Reads the config file (if present) and applies command line and
/// environment overrides on top.
pub fn load_config(args: &ConfigArgs) -> Result<ClientConfig> {
    let mut config = if args.config.exists() {
        debug!("Loading config from {:?}", args.config);
        let text = std::fs::read_to_string(&args.config)
            .with_context(|| format!("Failed to read config file {:?}", args.config))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {:?}", args.config))?
    } else {
        warn!("Config file {:?} not found, using defaults", args.config);
        ClientConfig::default()
    };

    if let Some(environment) = args.environment {
        config.environment = environment;
    }
    if let Some(account_id) = args.account_id {
        config.account_id = Some(account_id);
    }
    if let Some(customer_id) = args.customer_id {
        config.customer_id = Some(customer_id);
    }
    if let Some(token) = &args.developer_token {
        config.developer_token = token.clone();
    }
    if let Some(client_id) = &args.client_id {
        config.client_id = client_id.clone();
    }
    if let Some(secret) = &args.client_secret {
        config.client_secret = Some(secret.clone());
    }
    Ok(config)
}
