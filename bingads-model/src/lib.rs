//! Entity model for the Bing Ads sync layer.
//!
//! Defines the types the reconciler and the service client exchange:
//! - [`AdExtension`]: tagged union over the extension kinds (sitelink, callout, review)
//! - [`ContentKey`]: the fields that make two extensions "the same" regardless of remote id
//! - [`KindPolicy`]: per-kind cap, update mode and fetch scope
//! - [`Campaign`] / [`AdGroup`]: the containers extensions are associated with
//! - [`NegativeKeywordList`] / [`NegativeKeyword`]: shared library entities
//!
//! None of these types know how they are transported; wire mapping lives in
//! `bingads-client`.

mod campaign;
mod error;
mod extension;
mod policy;
mod shared;

pub use campaign::{AdGroup, Campaign};
pub use error::{ModelError, ModelResult};
pub use extension::{AdExtension, Callout, ContentKey, DevicePreference, Review, ReviewFormat, Sitelink};
pub use policy::{KindPolicy, UpdateMode};
pub use shared::{MatchType, NegativeKeyword, NegativeKeywordList};
