use bingads_cli::{execute, load_config, parse_desired, Cli, Command};
use bingads_model::{AdExtension, Callout, Campaign, DevicePreference, ReviewFormat};
use bingads_sync::mock::{MockRemote, RemoteCall};
use bingads_types::{AccountId, CampaignId, Environment, ExtensionKind, Status};
use clap::Parser;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("bingads").chain(args.iter().copied())).unwrap()
}

async fn run(remote: &Arc<MockRemote>, args: &[&str]) -> String {
    let cli = parse(args);
    let mut out = Vec::new();
    execute(cli.command, remote.clone(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

// ── Argument parsing ─────────────────────────────────────────────

#[test]
fn sync_arguments_parse() {
    let cli = parse(&[
        "-v", "sync", "callouts", "--file", "c.json", "--campaign", "1", "--campaign", "2", "--dry-run",
    ]);
    assert!(cli.verbose);
    match cli.command {
        Command::Sync { kind, campaigns, dry_run, allow_duplicates, .. } => {
            assert_eq!(kind, ExtensionKind::Callout);
            assert_eq!(campaigns.campaigns, vec![CampaignId::new(1), CampaignId::new(2)]);
            assert!(dry_run);
            assert!(!allow_duplicates);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn campaign_selection_flags_conflict() {
    let result = Cli::try_parse_from([
        "bingads", "sync", "callout", "--file", "c.json", "--campaign", "1", "--all-campaigns",
    ]);
    assert!(result.is_err());
}

#[test]
fn status_commands_require_ids() {
    assert!(Cli::try_parse_from(["bingads", "pause-campaigns"]).is_err());
    assert!(Cli::try_parse_from(["bingads", "pause-campaigns", "abc"]).is_err());
}

#[test]
fn config_overrides_parse() {
    let cli = parse(&["--environment", "sandbox", "--account-id", "42", "whoami"]);
    assert_eq!(cli.config.environment, Some(Environment::Sandbox));
    assert_eq!(cli.config.account_id, Some(AccountId::new(42)));
    assert!(matches!(cli.command, Command::WhoAmI));
}

// ── Config loading ───────────────────────────────────────────────

#[test]
fn config_file_and_overrides_merge() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bingads.json");
    std::fs::write(
        &path,
        r#"{ "account_id": 1, "developer_token": "from-file", "client_id": "cid" }"#,
    )
    .unwrap();

    let cli = parse(&[
        "--config",
        path.to_str().unwrap(),
        "--account-id",
        "2",
        "--environment",
        "sandbox",
        "negative-lists",
    ]);
    let config = load_config(&cli.config).unwrap();

    assert_eq!(config.account_id, Some(AccountId::new(2)));
    assert_eq!(config.developer_token, "from-file");
    assert_eq!(config.client_id, "cid");
    assert_eq!(config.environment, Environment::Sandbox);
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let cli = parse(&["--config", path.to_str().unwrap(), "--client-id", "cid", "negative-lists"]);

    let config = load_config(&cli.config).unwrap();
    assert_eq!(config.client_id, "cid");
    assert!(config.account_id.is_none());
}

#[test]
fn malformed_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bingads.json");
    std::fs::write(&path, "{ not json").unwrap();
    let cli = parse(&["--config", path.to_str().unwrap(), "negative-lists"]);

    let err = load_config(&cli.config).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

// ── Desired sets ─────────────────────────────────────────────────

#[test]
fn callouts_may_be_plain_strings() {
    let desired = parse_desired(r#"["Free Shipping", {"text": "24/7 Support"}]"#, ExtensionKind::Callout)
        .unwrap();
    assert_eq!(
        desired,
        vec![
            AdExtension::from(Callout::new("Free Shipping")),
            AdExtension::from(Callout::new("24/7 Support")),
        ]
    );
}

#[test]
fn sitelinks_and_reviews_parse_without_kind_tag() {
    let sitelinks = parse_desired(
        r#"[{
            "display_text": "Contact",
            "final_url": "https://example.com/contact",
            "description1": "Call us",
            "description2": "Any time",
            "device_preference": "mobile"
        }]"#,
        ExtensionKind::Sitelink,
    )
    .unwrap();
    match &sitelinks[0] {
        AdExtension::Sitelink(s) => assert_eq!(s.device_preference, DevicePreference::Mobile),
        other => panic!("unexpected {other:?}"),
    }

    let reviews = parse_desired(
        r#"[{ "format": "exact quote", "text": "Great", "source": "Paper" }]"#,
        ExtensionKind::Review,
    )
    .unwrap();
    match &reviews[0] {
        AdExtension::Review(r) => assert_eq!(r.format, ReviewFormat::ExactQuote),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn wrong_kind_or_shape_is_rejected() {
    assert!(parse_desired(r#"[{"kind": "callout", "text": "x"}]"#, ExtensionKind::Review).is_err());
    assert!(parse_desired(r#"["x"]"#, ExtensionKind::Sitelink).is_err());
    assert!(parse_desired(r#"{"text": "x"}"#, ExtensionKind::Callout).is_err());
}

// ── Execution ────────────────────────────────────────────────────

#[tokio::test]
async fn sync_reconciles_against_all_campaigns() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("callouts.json");
    std::fs::write(&file, r#"["B", "C"]"#).unwrap();

    let remote = Arc::new(MockRemote::new());
    remote.seed_campaign(Campaign::new(CampaignId::new(1), "Brand", Status::Active));
    remote.seed_campaign(Campaign::new(CampaignId::new(2), "Generic", Status::Paused));
    remote.seed(Callout::new("A").into(), &[CampaignId::new(1), CampaignId::new(2)]);

    let out = run(&remote, &["sync", "callout", "--file", file.to_str().unwrap(), "--all-campaigns"]).await;

    assert!(out.starts_with("callout: deleted 1, created 2, updated 0, kept 0, associated 4, detached 0"));
    assert_eq!(remote.extensions(ExtensionKind::Callout).len(), 2);
    assert!(!remote
        .calls()
        .iter()
        .any(|c| matches!(c, RemoteCall::ExtensionCampaigns(..))));
}

#[tokio::test]
async fn sync_for_one_campaign_detaches_shared_callouts() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("callouts.json");
    std::fs::write(&file, r#"["B"]"#).unwrap();

    let remote = Arc::new(MockRemote::new());
    let shared = remote.seed(Callout::new("A").into(), &[CampaignId::new(1), CampaignId::new(2)]);

    let dry = run(
        &remote,
        &["sync", "callout", "--file", file.to_str().unwrap(), "--campaign", "1", "--dry-run"],
    )
    .await;
    assert!(dry.contains("callout: delete 0, create 1, update 0, keep 0, detach 1"));
    assert!(dry.contains("  detach [1001]"));

    let out = run(&remote, &["sync", "callout", "--file", file.to_str().unwrap(), "--campaign", "1"]).await;

    assert!(out.starts_with("callout: deleted 0, created 1, updated 0, kept 0, associated 1, detached 1"));
    assert_eq!(remote.extensions(ExtensionKind::Callout).len(), 2);
    assert_eq!(remote.associated_campaigns(shared), vec![CampaignId::new(2)]);
}

#[tokio::test]
async fn dry_run_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("callouts.json");
    std::fs::write(&file, r#"["B"]"#).unwrap();

    let remote = Arc::new(MockRemote::new());
    remote.seed(Callout::new("A").into(), &[CampaignId::new(1)]);

    let out = run(
        &remote,
        &["sync", "callout", "--file", file.to_str().unwrap(), "--campaign", "1", "--dry-run"],
    )
    .await;

    assert!(out.contains("callout: delete 1, create 1, update 0, keep 0"));
    assert!(out.contains("  delete [1001]"));
    assert!(out.contains("  create [new]"));
    assert!(remote.calls().iter().all(|c| !c.is_mutation()));
}

#[tokio::test]
async fn pause_campaigns_reports_changes() {
    let remote = Arc::new(MockRemote::new());
    remote.seed_campaign(Campaign::new(CampaignId::new(1), "Brand", Status::Active));
    remote.seed_campaign(Campaign::new(CampaignId::new(2), "Generic", Status::Paused));

    let out = run(&remote, &["pause-campaigns", "1", "2"]).await;

    assert_eq!(out, "Paused 1 campaigns\n");
    assert_eq!(remote.campaign(CampaignId::new(1)).unwrap().status, Status::Paused);
}

#[tokio::test]
async fn campaigns_listing_filters_by_status() {
    let remote = Arc::new(MockRemote::new());
    remote.seed_campaign(Campaign::new(CampaignId::new(1), "Brand", Status::Active));
    remote.seed_campaign(Campaign::new(CampaignId::new(2), "Generic", Status::Paused));

    let out = run(&remote, &["campaigns", "--status", "paused"]).await;

    assert_eq!(out, "2\tPaused\tGeneric\n");
}

#[tokio::test]
async fn negative_lists_are_assigned_to_active_campaigns() {
    let remote = Arc::new(MockRemote::new());
    remote.seed_campaign(Campaign::new(CampaignId::new(1), "Brand", Status::Active));
    remote.seed_campaign(Campaign::new(CampaignId::new(2), "Generic", Status::Paused));
    let list = remote.seed_list("Jobs", &[]);

    let out = run(&remote, &["assign-negative-lists", "--active-campaigns"]).await;

    assert_eq!(out, "Assigned 1 list/campaign pairs\n");
    assert_eq!(remote.list_campaigns(list), vec![CampaignId::new(1)]);
}

#[tokio::test]
async fn detach_requires_campaigns() {
    let remote = Arc::new(MockRemote::new());
    let cli = parse(&["detach", "callout", "--extension", "5"]);
    let mut out = Vec::new();

    let err = execute(cli.command, remote.clone(), &mut out).await.unwrap_err();
    assert!(err.to_string().contains("select campaigns"));
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn delete_all_counts_deleted() {
    let remote = Arc::new(MockRemote::new());
    remote.seed(Callout::new("A").into(), &[]);
    remote.seed(Callout::new("B").into(), &[CampaignId::new(1)]);

    let out = run(&remote, &["delete-all", "callout", "--attached-only"]).await;

    assert_eq!(out, "Deleted 1 callout extensions\n");
    assert!(remote.calls().contains(&RemoteCall::Fetch(ExtensionKind::Callout)));
}
