use bingads_client::{
    ClientConfig, ClientError, MemoryTokenStore, ServiceKind, Session, TokenStore,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        developer_token: "dev".into(),
        client_id: "cid".into(),
        oauth_token_url: Some(format!("{}/token", server.uri())),
        ..Default::default()
    }
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected() {
    let err = Session::new(ClientConfig::default(), Arc::new(MemoryTokenStore::default()))
        .unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn service_endpoints_are_resolved_once() {
    let cfg = ClientConfig {
        developer_token: "dev".into(),
        client_id: "cid".into(),
        ..Default::default()
    };
    let session = Session::new(cfg, Arc::new(MemoryTokenStore::default())).unwrap();

    let campaign = session.service(ServiceKind::CampaignManagement);
    assert_eq!(campaign.kind(), ServiceKind::CampaignManagement);
    assert_eq!(
        campaign.endpoint("Campaigns/QueryByAccountId"),
        "https://campaign.api.bingads.microsoft.com/CampaignManagement/v13/Campaigns/QueryByAccountId"
    );
    assert_eq!(
        session.service(ServiceKind::CustomerManagement).endpoint("/User/Query"),
        "https://clientcenter.api.bingads.microsoft.com/CustomerManagement/v13/User/Query"
    );
    assert_eq!(ServiceKind::CampaignManagement.to_string(), "CampaignManagementService");
}

// ── Token refresh ────────────────────────────────────────────────

#[tokio::test]
async fn refresh_uses_stored_token_and_persists_rotation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "a1",
            "refresh_token": "r2",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new(Some("r1".into())));
    let session = Session::new(config(&server), store.clone()).unwrap();

    assert_eq!(session.access_token().await.unwrap(), "a1");
    assert_eq!(session.access_token().await.unwrap(), "a1");
    assert_eq!(store.load().unwrap().as_deref(), Some("r2"));
}

#[tokio::test]
async fn missing_refresh_token_requires_auth() {
    let server = MockServer::start().await;
    let session = Session::new(config(&server), Arc::new(MemoryTokenStore::default())).unwrap();

    let err = session.access_token().await.unwrap_err();
    assert!(matches!(err, ClientError::AuthRequired));
    assert!(err.is_auth());
}

#[tokio::test]
async fn rejected_refresh_reports_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "refresh token expired"
        })))
        .mount(&server)
        .await;

    let session = Session::new(
        config(&server),
        Arc::new(MemoryTokenStore::new(Some("stale".into()))),
    )
    .unwrap();

    let err = session.access_token().await.unwrap_err();
    match err {
        ClientError::Auth(msg) => assert!(msg.contains("refresh token expired")),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn expired_access_token_is_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new(Some("r1".into())));
    let session = Session::new(config(&server), store.clone()).unwrap();
    session.set_access_token("old".into(), Some(Duration::ZERO)).await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(session.access_token().await.unwrap(), "fresh");
    assert_eq!(store.load().unwrap().as_deref(), Some("r1"));
}

#[tokio::test]
async fn installed_access_token_is_used_without_refresh() {
    let server = MockServer::start().await;
    let session = Session::new(config(&server), Arc::new(MemoryTokenStore::default())).unwrap();
    session.set_access_token("manual".into(), None).await;

    assert_eq!(session.access_token().await.unwrap(), "manual");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
