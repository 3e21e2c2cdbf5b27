//! Reconciliation engine for Bing Ads ad extension libraries.
//!
//! Synchronizes a caller-supplied desired set of extensions (sitelinks,
//! callouts, reviews) with the account library and re-associates the result
//! with an explicit set of campaigns.
//!
//! # Architecture
//!
//! - **Merge**: pairs two keyed sequences by key ([`merge`])
//! - **Plan**: pure three-way diff into delete/create/update/keep sets ([`ReconcilePlan`])
//! - **Reconciler**: validates, fetches, plans and applies one pass ([`Reconciler`])
//! - **Library**: the remote operations consumed ([`ExtensionLibrary`], [`CampaignDirectory`], [`SharedListLibrary`])
//! - **Status / shared**: batch helpers that need no diffing ([`status`], [`shared`])
//!
//! ## Pass
//!
//! 1. **Validate**: cap, kind, fields and duplicate keys, before any remote call
//! 2. **Fetch**: read the current library for the kind
//! 3. **Plan**: sort both sides by content key and merge
//! 4. **Apply**: delete, then create, then update, then associate
//!
//! Steps are awaited one after another. A failing step aborts the pass with
//! [`SyncError::RemoteCallFailed`]; nothing already applied is rolled back,
//! and re-running the pass converges because planning starts from a fresh
//! fetch.
//!
//! # Example
//!
//! ```
//! use bingads_sync::{Reconciler, ReconcileScope};
//! use bingads_sync::mock::MockRemote;
//! use bingads_model::{AdExtension, Callout};
//! use bingads_types::{CampaignId, ExtensionKind};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let remote = Arc::new(MockRemote::new());
//! let reconciler = Reconciler::new(remote.clone());
//! let desired = vec![AdExtension::from(Callout::new("Free shipping"))];
//! let scope = ReconcileScope::campaigns([CampaignId::new(1)]);
//!
//! let outcome = reconciler.reconcile(ExtensionKind::Callout, desired, &scope).await.unwrap();
//! assert_eq!(outcome.created, 1);
//! # });
//! ```

mod error;
pub mod library;
mod merge;
pub mod mock;
pub mod plan;
mod reconciler;
pub mod shared;
pub mod status;

pub use error::{RemoteError, RemoteResult, Step, Subject, SyncError, SyncResult};
pub use library::{CampaignDirectory, ExtensionLibrary, SharedListLibrary};
pub use merge::{merge, merge_with_default};
pub use plan::{prepare_desired, DuplicatePolicy, ReconcilePlan};
pub use reconciler::{ReconcileConfig, ReconcileOutcome, ReconcileScope, Reconciler};
