//! Batch status changes for campaigns and ad groups.
//!
//! A flip only touches entities currently in the opposite status: everything
//! in that status is fetched, narrowed to the requested ids, mutated locally
//! and sent back with one update call per parent container.

use crate::error::{Step, Subject, SyncError, SyncResult};
use crate::library::CampaignDirectory;
use bingads_model::{AdGroup, Campaign};
use bingads_types::{AdGroupId, CampaignId, Status};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// All campaigns of the account.
pub async fn campaigns(directory: &dyn CampaignDirectory) -> SyncResult<Vec<Campaign>> {
    directory
        .campaigns()
        .await
        .map_err(SyncError::remote(Subject::Campaign, Step::Fetch))
}

pub async fn campaigns_by_status(
    directory: &dyn CampaignDirectory,
    status: Status,
) -> SyncResult<Vec<Campaign>> {
    let mut all = campaigns(directory).await?;
    all.retain(|c| c.status == status);
    Ok(all)
}

pub async fn active_campaigns(directory: &dyn CampaignDirectory) -> SyncResult<Vec<Campaign>> {
    campaigns_by_status(directory, Status::Active).await
}

pub async fn paused_campaigns(directory: &dyn CampaignDirectory) -> SyncResult<Vec<Campaign>> {
    campaigns_by_status(directory, Status::Paused).await
}

/// Ad groups of the given campaigns, or of every campaign when `campaign_ids`
/// is `None`.
pub async fn ad_groups(
    directory: &dyn CampaignDirectory,
    campaign_ids: Option<&[CampaignId]>,
) -> SyncResult<Vec<AdGroup>> {
    let ids: Vec<CampaignId> = match campaign_ids {
        Some(ids) => ids.to_vec(),
        None => campaigns(directory).await?.into_iter().map(|c| c.id).collect(),
    };

    let mut groups = Vec::new();
    for campaign_id in ids {
        let found = directory
            .ad_groups(campaign_id)
            .await
            .map_err(SyncError::remote(Subject::AdGroup, Step::Fetch))?;
        groups.extend(found);
    }
    Ok(groups)
}

pub async fn ad_groups_by_status(
    directory: &dyn CampaignDirectory,
    status: Status,
    campaign_ids: Option<&[CampaignId]>,
) -> SyncResult<Vec<AdGroup>> {
    let mut groups = ad_groups(directory, campaign_ids).await?;
    groups.retain(|g| g.status == status);
    Ok(groups)
}

/// Active ad groups under active campaigns.
pub async fn active_ad_groups(directory: &dyn CampaignDirectory) -> SyncResult<Vec<AdGroup>> {
    let active: Vec<CampaignId> = active_campaigns(directory)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    if active.is_empty() {
        return Ok(Vec::new());
    }
    ad_groups_by_status(directory, Status::Active, Some(active.as_slice())).await
}

/// Sets `status` on the listed campaigns. Campaigns already in `status` or
/// not found are left alone. Returns the campaigns that were changed.
pub async fn change_campaign_status(
    directory: &dyn CampaignDirectory,
    campaign_ids: &[CampaignId],
    status: Status,
) -> SyncResult<Vec<Campaign>> {
    let wanted: HashSet<CampaignId> = campaign_ids.iter().copied().collect();
    let mut changed = campaigns_by_status(directory, status.opposite()).await?;
    changed.retain(|c| wanted.contains(&c.id));
    for campaign in &mut changed {
        campaign.status = status;
    }

    if changed.is_empty() {
        debug!("No campaigns to set {status}");
        return Ok(changed);
    }
    directory
        .update_campaigns(&changed)
        .await
        .map_err(SyncError::remote(Subject::Campaign, Step::Update))?;
    info!("Set {} campaigns {status}", changed.len());
    Ok(changed)
}

/// Sets `status` on the listed ad groups, issuing one update per owning
/// campaign. Returns the ad groups that were changed.
pub async fn change_ad_group_status(
    directory: &dyn CampaignDirectory,
    ad_group_ids: &[AdGroupId],
    status: Status,
) -> SyncResult<Vec<AdGroup>> {
    let wanted: HashSet<AdGroupId> = ad_group_ids.iter().copied().collect();
    let mut changed = ad_groups_by_status(directory, status.opposite(), None).await?;
    changed.retain(|g| wanted.contains(&g.id));
    for group in &mut changed {
        group.status = status;
    }

    let mut by_campaign: BTreeMap<CampaignId, Vec<AdGroup>> = BTreeMap::new();
    for group in &changed {
        by_campaign.entry(group.campaign_id).or_default().push(group.clone());
    }
    for (campaign_id, groups) in &by_campaign {
        debug!("Setting {} ad groups {status} in campaign {campaign_id}", groups.len());
        directory
            .update_ad_groups(*campaign_id, groups)
            .await
            .map_err(SyncError::remote(Subject::AdGroup, Step::Update))?;
    }
    if !changed.is_empty() {
        info!("Set {} ad groups {status} across {} campaigns", changed.len(), by_campaign.len());
    }
    Ok(changed)
}

pub async fn pause_campaigns(
    directory: &dyn CampaignDirectory,
    campaign_ids: &[CampaignId],
) -> SyncResult<Vec<Campaign>> {
    change_campaign_status(directory, campaign_ids, Status::Paused).await
}

pub async fn activate_campaigns(
    directory: &dyn CampaignDirectory,
    campaign_ids: &[CampaignId],
) -> SyncResult<Vec<Campaign>> {
    change_campaign_status(directory, campaign_ids, Status::Active).await
}

pub async fn pause_ad_groups(
    directory: &dyn CampaignDirectory,
    ad_group_ids: &[AdGroupId],
) -> SyncResult<Vec<AdGroup>> {
    change_ad_group_status(directory, ad_group_ids, Status::Paused).await
}

pub async fn activate_ad_groups(
    directory: &dyn CampaignDirectory,
    ad_group_ids: &[AdGroupId],
) -> SyncResult<Vec<AdGroup>> {
    change_ad_group_status(directory, ad_group_ids, Status::Active).await
}
