//! Command line arguments.

use crate::config::DEFAULT_CONFIG_FILE;
use bingads_client::DEFAULT_TOKEN_FILE;
use bingads_sync::{status, CampaignDirectory, ReconcileScope, SyncResult};
use bingads_types::{
    AccountId, AdExtensionId, AdGroupId, CampaignId, CustomerId, Environment, ExtensionKind,
    SharedEntityId, Status,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bingads", version)]
#[command(about = "Sync Bing Ads extensions and manage campaign status")]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that override the config file.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the JSON config file
    #[arg(long, env = "BINGADS_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// File the OAuth refresh token is kept in
    #[arg(long, env = "BINGADS_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    /// API environment (production or sandbox)
    #[arg(long, env = "BINGADS_ENVIRONMENT")]
    pub environment: Option<Environment>,

    #[arg(long, env = "BINGADS_ACCOUNT_ID")]
    pub account_id: Option<AccountId>,

    #[arg(long, env = "BINGADS_CUSTOMER_ID")]
    pub customer_id: Option<CustomerId>,

    #[arg(long, env = "BINGADS_DEVELOPER_TOKEN", hide_env_values = true)]
    pub developer_token: Option<String>,

    #[arg(long, env = "BINGADS_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "BINGADS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

/// Which campaigns a command targets.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSelection {
    /// Campaign id (repeatable)
    #[arg(long = "campaign", value_name = "ID")]
    pub campaigns: Vec<CampaignId>,

    /// Every campaign of the account
    #[arg(long, conflicts_with_all = ["campaigns", "active_campaigns"])]
    pub all_campaigns: bool,

    /// Every active campaign of the account
    #[arg(long, conflicts_with = "campaigns")]
    pub active_campaigns: bool,
}

impl CampaignSelection {
    /// Turns the selection into an explicit scope, listing campaigns when
    /// asked for all or all active ones. Only `--all-campaigns` covers the
    /// whole account.
    pub async fn resolve(&self, directory: &dyn CampaignDirectory) -> SyncResult<ReconcileScope> {
        if self.all_campaigns {
            let campaigns = status::campaigns(directory).await?;
            return Ok(ReconcileScope::all_campaigns(campaigns.into_iter().map(|c| c.id)));
        }
        if self.active_campaigns {
            let campaigns = status::active_campaigns(directory).await?;
            return Ok(ReconcileScope::campaigns(campaigns.into_iter().map(|c| c.id)));
        }
        Ok(ReconcileScope::campaigns(self.campaigns.iter().copied()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile one extension kind with the desired set in a JSON file
    Sync {
        /// sitelink, callout or review
        kind: ExtensionKind,

        /// JSON array of desired extensions
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        campaigns: CampaignSelection,

        /// Print the plan without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Keep the first of repeated entries instead of failing
        #[arg(long)]
        allow_duplicates: bool,
    },

    /// List extensions of a kind in the account library
    List { kind: ExtensionKind },

    /// Show the extensions attached to campaigns
    Associations {
        kind: ExtensionKind,

        #[command(flatten)]
        campaigns: CampaignSelection,
    },

    /// Delete every extension of a kind
    DeleteAll {
        kind: ExtensionKind,

        /// Only delete extensions attached to a campaign
        #[arg(long)]
        attached_only: bool,
    },

    /// Detach an extension from campaigns without deleting it
    Detach {
        kind: ExtensionKind,

        #[arg(long, value_name = "ID")]
        extension: AdExtensionId,

        #[command(flatten)]
        campaigns: CampaignSelection,
    },

    /// List campaigns
    Campaigns {
        #[arg(long)]
        status: Option<Status>,
    },

    /// List ad groups
    AdGroups {
        /// Campaign id (repeatable); all campaigns when omitted
        #[arg(long = "campaign", value_name = "ID")]
        campaigns: Vec<CampaignId>,

        #[arg(long)]
        status: Option<Status>,
    },

    /// Pause active campaigns
    PauseCampaigns {
        #[arg(required = true)]
        ids: Vec<CampaignId>,
    },

    /// Activate paused campaigns
    ActivateCampaigns {
        #[arg(required = true)]
        ids: Vec<CampaignId>,
    },

    /// Pause active ad groups
    PauseAdGroups {
        #[arg(required = true)]
        ids: Vec<AdGroupId>,
    },

    /// Activate paused ad groups
    ActivateAdGroups {
        #[arg(required = true)]
        ids: Vec<AdGroupId>,
    },

    /// List negative keyword lists
    NegativeLists,

    /// Create a negative keyword list unless one with that name exists
    EnsureNegativeList { name: String },

    /// Attach every negative keyword list to the selected campaigns
    AssignNegativeLists {
        #[command(flatten)]
        campaigns: CampaignSelection,
    },

    /// Detach a negative keyword list from all of its campaigns
    DetachNegativeList { id: SharedEntityId },

    /// Print the signed-in user's id
    #[command(name = "whoami")]
    WhoAmI,
}
