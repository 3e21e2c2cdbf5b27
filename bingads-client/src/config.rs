//! Session configuration.

use crate::error::{ClientError, ClientResult};
use crate::session::ServiceKind;
use bingads_types::{AccountId, CustomerId, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Credentials and endpoints for one account.
///
/// Service and token URLs are derived from [`Environment`] unless set
/// explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Account that owns the entities. Sent as `CustomerAccountId`.
    pub account_id: Option<AccountId>,
    /// Customer that owns the account. Sent as `CustomerId`.
    pub customer_id: Option<CustomerId>,
    pub developer_token: String,
    /// OAuth client id of the registered application.
    pub client_id: String,
    /// Only web applications have a secret.
    pub client_secret: Option<String>,
    pub oauth_token_url: Option<String>,
    pub campaign_service_url: Option<String>,
    pub customer_service_url: Option<String>,
    /// HTTP timeout for every request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            account_id: None,
            customer_id: None,
            developer_token: String::new(),
            client_id: String::new(),
            client_secret: None,
            oauth_token_url: None,
            campaign_service_url: None,
            customer_service_url: None,
            timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Base URL of a service, without the service path.
    pub fn service_url(&self, kind: ServiceKind) -> String {
        let explicit = match kind {
            ServiceKind::CampaignManagement => &self.campaign_service_url,
            ServiceKind::CustomerManagement => &self.customer_service_url,
        };
        if let Some(url) = explicit {
            return url.trim_end_matches('/').to_string();
        }
        let url = match (kind, self.environment) {
            (ServiceKind::CampaignManagement, Environment::Production) => {
                "https://campaign.api.bingads.microsoft.com"
            }
            (ServiceKind::CampaignManagement, Environment::Sandbox) => {
                "https://campaign.api.sandbox.bingads.microsoft.com"
            }
            (ServiceKind::CustomerManagement, Environment::Production) => {
                "https://clientcenter.api.bingads.microsoft.com"
            }
            (ServiceKind::CustomerManagement, Environment::Sandbox) => {
                "https://clientcenter.api.sandbox.bingads.microsoft.com"
            }
        };
        url.to_string()
    }

    pub fn token_url(&self) -> String {
        match (&self.oauth_token_url, self.environment) {
            (Some(url), _) => url.clone(),
            (None, Environment::Production) => {
                "https://login.microsoftonline.com/common/oauth2/v2.0/token".to_string()
            }
            (None, Environment::Sandbox) => {
                "https://login.windows-ppe.net/consumers/oauth2/v2.0/token".to_string()
            }
        }
    }

    /// OAuth scope requested on token refresh.
    pub fn oauth_scope(&self) -> &'static str {
        match self.environment {
            Environment::Production => "https://ads.microsoft.com/msads.manage offline_access",
            Environment::Sandbox => "https://api.ads.microsoft.com/msads.manage offline_access",
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The account id, required by every campaign management call.
    pub fn require_account_id(&self) -> ClientResult<AccountId> {
        self.account_id
            .ok_or_else(|| ClientError::Config("account_id is not set".to_string()))
    }

    /// Checks the fields every session needs.
    pub fn validate(&self) -> ClientResult<()> {
        if self.developer_token.trim().is_empty() {
            return Err(ClientError::Config("developer_token is not set".to_string()));
        }
        if self.client_id.trim().is_empty() {
            return Err(ClientError::Config("client_id is not set".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
