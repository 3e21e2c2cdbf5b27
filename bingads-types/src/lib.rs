//! Core type definitions for the Bing Ads sync layer.
//!
//! This crate defines the small, dependency-free vocabulary shared by every
//! other crate in the workspace:
//! - Remote identifiers (accounts, campaigns, ad groups, ad extensions, shared lists)
//! - Entity status (`Active` / `Paused`)
//! - Ad extension kinds and association types
//! - API environments
//!
//! Anything with behaviour (content keys, reconciliation, transport) lives
//! in the higher crates.

mod ids;
mod kind;
mod status;

pub use ids::{AccountId, AdExtensionId, AdGroupId, CampaignId, CustomerId, SharedEntityId, UserId};
pub use kind::{AssociationType, Environment, ExtensionKind};
pub use status::Status;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing core types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("invalid {field}: `{value}`")]
    InvalidValue { field: &'static str, value: String },
}
