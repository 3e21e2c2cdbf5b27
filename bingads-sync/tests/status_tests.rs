use bingads_model::{AdGroup, Campaign};
use bingads_sync::mock::{MockRemote, RemoteCall};
use bingads_sync::{status, Step};
use bingads_types::{AdGroupId, CampaignId, Status};
use pretty_assertions::assert_eq;

fn seeded() -> MockRemote {
    let remote = MockRemote::new();
    remote.seed_campaign(Campaign::new(CampaignId::new(1), "Brand", Status::Active));
    remote.seed_campaign(Campaign::new(CampaignId::new(2), "Generic", Status::Paused));
    remote.seed_campaign(Campaign::new(CampaignId::new(3), "Retargeting", Status::Active));
    remote.seed_ad_group(AdGroup::new(AdGroupId::new(10), "brand a", Status::Active, CampaignId::new(1)));
    remote.seed_ad_group(AdGroup::new(AdGroupId::new(11), "brand b", Status::Paused, CampaignId::new(1)));
    remote.seed_ad_group(AdGroup::new(AdGroupId::new(20), "generic a", Status::Active, CampaignId::new(2)));
    remote.seed_ad_group(AdGroup::new(AdGroupId::new(30), "retarget a", Status::Active, CampaignId::new(3)));
    remote
}

fn campaign_ids(campaigns: &[Campaign]) -> Vec<i64> {
    campaigns.iter().map(|c| c.id.get()).collect()
}

fn group_ids(groups: &[AdGroup]) -> Vec<i64> {
    groups.iter().map(|g| g.id.get()).collect()
}

// ── Queries ──────────────────────────────────────────────────────

#[tokio::test]
async fn campaigns_by_status_filters() {
    let remote = seeded();
    assert_eq!(campaign_ids(&status::active_campaigns(&remote).await.unwrap()), vec![1, 3]);
    assert_eq!(campaign_ids(&status::paused_campaigns(&remote).await.unwrap()), vec![2]);
}

#[tokio::test]
async fn ad_groups_of_every_campaign() {
    let remote = seeded();
    let groups = status::ad_groups(&remote, None).await.unwrap();
    assert_eq!(group_ids(&groups), vec![10, 11, 20, 30]);
}

#[tokio::test]
async fn ad_groups_of_selected_campaigns() {
    let remote = seeded();
    let groups = status::ad_groups(&remote, Some(&[CampaignId::new(3)][..])).await.unwrap();
    assert_eq!(group_ids(&groups), vec![30]);
    assert!(!remote.calls().contains(&RemoteCall::Campaigns));
}

#[tokio::test]
async fn active_ad_groups_skip_paused_campaigns() {
    let remote = seeded();
    let groups = status::active_ad_groups(&remote).await.unwrap();
    assert_eq!(group_ids(&groups), vec![10, 30]);
}

// ── Status changes ───────────────────────────────────────────────

#[tokio::test]
async fn pause_campaigns_only_touches_active_ones() {
    let remote = seeded();
    let ids = [CampaignId::new(1), CampaignId::new(2)];

    let changed = status::pause_campaigns(&remote, &ids).await.unwrap();

    assert_eq!(campaign_ids(&changed), vec![1]);
    assert_eq!(remote.campaign(CampaignId::new(1)).unwrap().status, Status::Paused);
    let updates: Vec<_> = remote
        .calls()
        .into_iter()
        .filter(|c| matches!(c, RemoteCall::UpdateCampaigns(_)))
        .collect();
    assert_eq!(updates.len(), 1);
}

#[tokio::test]
async fn activating_active_campaigns_sends_nothing() {
    let remote = seeded();

    let changed = status::activate_campaigns(&remote, &[CampaignId::new(1)]).await.unwrap();

    assert!(changed.is_empty());
    assert_eq!(remote.calls(), vec![RemoteCall::Campaigns]);
}

#[tokio::test]
async fn ad_group_updates_are_grouped_by_campaign() {
    let remote = seeded();
    let ids = [AdGroupId::new(10), AdGroupId::new(20), AdGroupId::new(30)];

    let changed = status::pause_ad_groups(&remote, &ids).await.unwrap();

    assert_eq!(changed.len(), 3);
    let updates: Vec<CampaignId> = remote
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            RemoteCall::UpdateAdGroups(campaign, _) => Some(campaign),
            _ => None,
        })
        .collect();
    assert_eq!(updates, vec![CampaignId::new(1), CampaignId::new(2), CampaignId::new(3)]);
    assert_eq!(remote.ad_group(AdGroupId::new(20)).unwrap().status, Status::Paused);
}

#[tokio::test]
async fn activate_ad_groups_ignores_unknown_ids() {
    let remote = seeded();

    let changed = status::activate_ad_groups(&remote, &[AdGroupId::new(11), AdGroupId::new(99)])
        .await
        .unwrap();

    assert_eq!(group_ids(&changed), vec![11]);
    assert_eq!(remote.ad_group(AdGroupId::new(11)).unwrap().status, Status::Active);
}

#[tokio::test]
async fn failed_update_is_reported_with_subject() {
    let remote = seeded();
    remote.fail_at(Step::Update);

    let err = status::pause_campaigns(&remote, &[CampaignId::new(1)]).await.unwrap_err();

    assert_eq!(err.step(), Some(Step::Update));
    assert!(err.to_string().contains("campaign"));
}
