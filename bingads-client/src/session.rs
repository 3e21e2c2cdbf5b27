//! Authenticated session shared by every service client.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::token_store::TokenStore;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// API version all service paths are built against.
pub const API_VERSION: &str = "v13";

/// The services a session can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    CustomerManagement,
    CampaignManagement,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 2] = [Self::CustomerManagement, Self::CampaignManagement];

    /// Path segment the service is mounted under.
    pub const fn path(self) -> &'static str {
        match self {
            Self::CustomerManagement => "CustomerManagement",
            Self::CampaignManagement => "CampaignManagement",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Service", self.path())
    }
}

/// Resolved endpoint root of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceClient {
    kind: ServiceKind,
    root: String,
}

impl ServiceClient {
    fn new(kind: ServiceKind, base_url: &str) -> Self {
        let root = format!("{}/{}/{API_VERSION}", base_url.trim_end_matches('/'), kind.path());
        Self { kind, root }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Full URL of an operation, e.g. `AdExtensions/QueryByIds`.
    pub fn endpoint(&self, operation_path: &str) -> String {
        format!("{}/{}", self.root, operation_path.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone)]
struct OAuthTokens {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<SystemTime>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Credentials, HTTP client and token cache for one account.
///
/// Create one per process and share it by reference. Access tokens are
/// refreshed lazily; rotated refresh tokens are written back through the
/// injected [`TokenStore`].
pub struct Session {
    config: ClientConfig,
    http: Client,
    token_store: Arc<dyn TokenStore>,
    tokens: RwLock<Option<OAuthTokens>>,
    services: HashMap<ServiceKind, ServiceClient>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("environment", &self.config.environment)
            .field("account_id", &self.config.account_id)
            .field("token_store", &self.token_store)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(config: ClientConfig, token_store: Arc<dyn TokenStore>) -> ClientResult<Self> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout()).build()?;

        let services = ServiceKind::ALL
            .into_iter()
            .map(|kind| (kind, ServiceClient::new(kind, &config.service_url(kind))))
            .collect();

        info!(
            "Bing Ads session for account {} ({})",
            config.account_id.map_or_else(|| "<unset>".to_string(), |id| id.to_string()),
            config.environment
        );

        Ok(Self {
            config,
            http,
            token_store,
            tokens: RwLock::new(None),
            services,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// The cached client of a service.
    pub fn service(&self, kind: ServiceKind) -> &ServiceClient {
        &self.services[&kind]
    }

    /// Installs an access token directly, e.g. one obtained out of band.
    pub async fn set_access_token(&self, access_token: String, expires_in: Option<Duration>) {
        let mut guard = self.tokens.write().await;
        let refresh_token = guard.as_ref().and_then(|t| t.refresh_token.clone());
        *guard = Some(OAuthTokens {
            access_token,
            refresh_token,
            expires_at: expires_in.map(|d| SystemTime::now() + d),
        });
    }

    /// Gets the current access token, refreshing if needed.
    pub async fn access_token(&self) -> ClientResult<String> {
        {
            let guard = self.tokens.read().await;
            if let Some(tokens) = guard.as_ref() {
                let expired = tokens
                    .expires_at
                    .is_some_and(|exp| SystemTime::now() > exp);
                if !expired {
                    return Ok(tokens.access_token.clone());
                }
            }
        }
        self.refresh().await
    }

    /// Exchanges the refresh token for a new access token.
    pub async fn refresh(&self) -> ClientResult<String> {
        let cached = self
            .tokens
            .read()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone());
        let refresh_token = match cached {
            Some(token) => token,
            None => self.token_store.load()?.ok_or(ClientError::AuthRequired)?,
        };

        debug!("Refreshing Bing Ads access token");

        let mut form = vec![
            ("client_id", self.config.client_id.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("scope", self.config.oauth_scope()),
        ];
        if let Some(secret) = self.config.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .http
            .post(self.config.token_url())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(e) => e.error_description.unwrap_or(e.error),
                Err(_) => body,
            };
            return Err(ClientError::Auth(format!("token refresh failed ({status}): {reason}")));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Auth(format!("failed to parse token response: {e}")))?;

        let expires_at = token_response
            .expires_in
            .map(|secs| SystemTime::now() + Duration::from_secs(secs.saturating_sub(60)));

        if let Some(rotated) = token_response.refresh_token.as_deref() {
            if rotated != refresh_token {
                if let Err(e) = self.token_store.save(rotated) {
                    warn!("Failed to persist refreshed token: {e}");
                }
            }
        }

        *self.tokens.write().await = Some(OAuthTokens {
            access_token: token_response.access_token.clone(),
            refresh_token: token_response.refresh_token.or(Some(refresh_token)),
            expires_at,
        });

        Ok(token_response.access_token)
    }
}
