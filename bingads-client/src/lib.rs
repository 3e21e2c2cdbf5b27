//! Bing Ads service client.
//!
//! Provides the remote side of the sync layer:
//! - [`Session`]: credentials, lazy OAuth token refresh and the per-service
//!   endpoint table, created once per process
//! - [`TokenStore`]: where refresh tokens are kept ([`FileTokenStore`],
//!   [`MemoryTokenStore`])
//! - [`BingAdsClient`]: implements [`ExtensionLibrary`], [`CampaignDirectory`]
//!   and [`SharedListLibrary`] over the Campaign Management JSON API
//!
//! ```no_run
//! use bingads_client::{BingAdsClient, ClientConfig, FileTokenStore, Session};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), bingads_client::ClientError> {
//! let config = ClientConfig {
//!     developer_token: "token".into(),
//!     client_id: "client".into(),
//!     account_id: Some(123.into()),
//!     ..Default::default()
//! };
//! let session = Arc::new(Session::new(config, Arc::new(FileTokenStore::default()))?);
//! let client = Arc::new(BingAdsClient::new(session));
//! let reconciler = bingads_sync::Reconciler::new(client);
//! # let _ = reconciler;
//! # Ok(())
//! # }
//! ```
//!
//! [`ExtensionLibrary`]: bingads_sync::ExtensionLibrary
//! [`CampaignDirectory`]: bingads_sync::CampaignDirectory
//! [`SharedListLibrary`]: bingads_sync::SharedListLibrary

mod client;
mod config;
mod error;
mod session;
mod token_store;
mod wire;

pub use client::BingAdsClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use session::{ServiceClient, ServiceKind, Session, API_VERSION};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, DEFAULT_TOKEN_FILE};
