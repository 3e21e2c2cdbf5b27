//! Command execution against any remote.

use crate::cli::Command;
use crate::desired::load_desired;
use anyhow::{bail, Result};
use bingads_model::AdExtension;
use bingads_sync::{
    shared, status, CampaignDirectory, DuplicatePolicy, ExtensionLibrary, ReconcileConfig,
    Reconciler, SharedListLibrary,
};
use bingads_types::AssociationType;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Runs one command and writes its report to `out`.
///
/// `whoami` needs the live service client and is handled by [`crate::run`].
pub async fn execute<R>(command: Command, remote: Arc<R>, out: &mut dyn Write) -> Result<()>
where
    R: ExtensionLibrary + CampaignDirectory + SharedListLibrary + 'static,
{
    let directory: &dyn CampaignDirectory = &*remote;
    let lists: &dyn SharedListLibrary = &*remote;

    match command {
        Command::Sync { kind, file, campaigns, dry_run, allow_duplicates } => {
            let desired = load_desired(&file, kind)?;
            let scope = campaigns.resolve(directory).await?;
            let duplicates = if allow_duplicates {
                DuplicatePolicy::KeepFirst
            } else {
                DuplicatePolicy::Reject
            };
            let config = ReconcileConfig::default().with_duplicate_policy(duplicates);
            let reconciler = Reconciler::with_config(remote.clone(), config);

            if dry_run {
                let plan = reconciler.plan(kind, desired, &scope).await?;
                writeln!(out, "{plan} ({scope}, dry run)")?;
                write_entries(out, "delete", &plan.to_delete)?;
                write_entries(out, "delete", &plan.redundant)?;
                write_entries(out, "detach", &plan.to_detach)?;
                write_entries(out, "create", &plan.to_create)?;
                write_entries(out, "update", &plan.to_update)?;
                write_entries(out, "keep", &plan.to_keep)?;
            } else {
                let outcome = reconciler.reconcile(kind, desired, &scope).await?;
                writeln!(
                    out,
                    "{kind}: deleted {}, created {}, updated {}, kept {}, associated {}, detached {}",
                    outcome.deleted.len(),
                    outcome.created,
                    outcome.updated,
                    outcome.kept,
                    outcome.associated,
                    outcome.detached.len()
                )?;
                for ext in &outcome.extensions {
                    writeln!(out, "  {ext}")?;
                }
            }
        }

        Command::List { kind } => {
            for ext in Reconciler::new(remote.clone()).list(kind).await? {
                writeln!(out, "{ext}")?;
            }
        }

        Command::Associations { kind, campaigns } => {
            let scope = campaigns.resolve(directory).await?;
            let by_campaign: BTreeMap<_, _> = Reconciler::new(remote.clone())
                .associations(kind, &scope.campaigns)
                .await?
                .into_iter()
                .collect();
            for (campaign, extensions) in by_campaign {
                for ext in extensions {
                    writeln!(out, "{campaign}\t{ext}")?;
                }
            }
        }

        Command::DeleteAll { kind, attached_only } => {
            let filter = attached_only.then_some(AssociationType::Campaign);
            let deleted = Reconciler::new(remote.clone()).delete_all(kind, filter).await?;
            writeln!(out, "Deleted {} {kind} extensions", deleted.len())?;
        }

        Command::Detach { kind, extension, campaigns } => {
            let scope = campaigns.resolve(directory).await?;
            if scope.is_empty() {
                bail!("select campaigns to detach extension {extension} from");
            }
            let pairs: Vec<_> = scope.campaigns.iter().map(|&c| (extension, c)).collect();
            Reconciler::new(remote.clone()).detach(kind, &pairs).await?;
            writeln!(out, "Detached {kind} {extension} from {scope}")?;
        }

        Command::Campaigns { status: wanted } => {
            let campaigns = match wanted {
                Some(s) => status::campaigns_by_status(directory, s).await?,
                None => status::campaigns(directory).await?,
            };
            for c in campaigns {
                writeln!(out, "{}\t{}\t{}", c.id, c.status, c.name)?;
            }
        }

        Command::AdGroups { campaigns, status: wanted } => {
            let selected = (!campaigns.is_empty()).then_some(campaigns.as_slice());
            let groups = match wanted {
                Some(s) => status::ad_groups_by_status(directory, s, selected).await?,
                None => status::ad_groups(directory, selected).await?,
            };
            for g in groups {
                writeln!(out, "{}\t{}\t{}\t{}", g.id, g.status, g.campaign_id, g.name)?;
            }
        }

        Command::PauseCampaigns { ids } => {
            let changed = status::pause_campaigns(directory, &ids).await?;
            writeln!(out, "Paused {} campaigns", changed.len())?;
        }
        Command::ActivateCampaigns { ids } => {
            let changed = status::activate_campaigns(directory, &ids).await?;
            writeln!(out, "Activated {} campaigns", changed.len())?;
        }
        Command::PauseAdGroups { ids } => {
            let changed = status::pause_ad_groups(directory, &ids).await?;
            writeln!(out, "Paused {} ad groups", changed.len())?;
        }
        Command::ActivateAdGroups { ids } => {
            let changed = status::activate_ad_groups(directory, &ids).await?;
            writeln!(out, "Activated {} ad groups", changed.len())?;
        }

        Command::NegativeLists => {
            for list in shared::negative_keyword_lists(lists).await? {
                let id = list.id.map_or_else(|| "-".to_string(), |id| id.to_string());
                writeln!(out, "{id}\t{}", list.name)?;
            }
        }
        Command::EnsureNegativeList { name } => {
            let list = shared::ensure_negative_keyword_list(lists, &name).await?;
            let id = list.id.map_or_else(|| "-".to_string(), |id| id.to_string());
            writeln!(out, "{id}\t{}", list.name)?;
        }
        Command::AssignNegativeLists { campaigns } => {
            let scope = campaigns.resolve(directory).await?;
            let pairs = shared::assign_negative_keyword_lists(lists, &scope.campaigns).await?;
            writeln!(out, "Assigned {pairs} list/campaign pairs")?;
        }
        Command::DetachNegativeList { id } => {
            let detached = shared::detach_negative_keyword_list(lists, id).await?;
            writeln!(out, "Detached list {id} from {detached} campaigns")?;
        }

        Command::WhoAmI => bail!("whoami requires a live session"),
    }

    info!("Done");
    Ok(())
}

fn write_entries(out: &mut dyn Write, action: &str, entries: &[AdExtension]) -> Result<()> {
    for ext in entries {
        writeln!(out, "  {action} {ext}")?;
    }
    Ok(())
}
