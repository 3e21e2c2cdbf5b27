//! Remote collaborator abstraction.
//!
//! Defines the operations the sync layer consumes from the service client,
//! so the reconciler can run against the real API or an in-memory mock.
//! Implementations own transport concerns (auth, retries, request limits);
//! every call here either completes or fails as a whole.

use crate::error::RemoteResult;
use async_trait::async_trait;
use bingads_model::{AdExtension, AdGroup, Campaign, NegativeKeyword, NegativeKeywordList};
use bingads_types::{AdExtensionId, AssociationType, CampaignId, ExtensionKind, SharedEntityId};
use std::collections::HashMap;

/// The account's ad extension library.
#[async_trait]
pub trait ExtensionLibrary: Send + Sync {
    /// Lists the extensions of `kind`, optionally only those associated at
    /// the given level.
    async fn fetch(
        &self,
        kind: ExtensionKind,
        filter: Option<AssociationType>,
    ) -> RemoteResult<Vec<AdExtension>>;

    /// Inserts extensions and returns their new ids in request order.
    async fn create(
        &self,
        kind: ExtensionKind,
        extensions: &[AdExtension],
    ) -> RemoteResult<Vec<AdExtensionId>>;

    /// Overwrites extensions by id.
    async fn update(&self, kind: ExtensionKind, extensions: &[AdExtension]) -> RemoteResult<()>;

    /// Deletes extensions by id. Their associations go with them.
    async fn delete(&self, kind: ExtensionKind, ids: &[AdExtensionId]) -> RemoteResult<()>;

    /// Attaches extensions to campaigns. Re-attaching is a no-op.
    async fn associate(
        &self,
        kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> RemoteResult<()>;

    /// Detaches extensions from campaigns without deleting them.
    async fn disassociate(
        &self,
        kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> RemoteResult<()>;

    /// Returns the extensions of `kind` attached to each of the campaigns.
    async fn associations(
        &self,
        kind: ExtensionKind,
        campaign_ids: &[CampaignId],
    ) -> RemoteResult<HashMap<CampaignId, Vec<AdExtension>>>;

    /// Returns every campaign each of the extensions is attached to. Ids
    /// attached nowhere may be missing from the map.
    async fn extension_campaigns(
        &self,
        kind: ExtensionKind,
        ids: &[AdExtensionId],
    ) -> RemoteResult<HashMap<AdExtensionId, Vec<CampaignId>>>;
}

/// Campaigns and ad groups of the account.
#[async_trait]
pub trait CampaignDirectory: Send + Sync {
    async fn campaigns(&self) -> RemoteResult<Vec<Campaign>>;

    async fn update_campaigns(&self, campaigns: &[Campaign]) -> RemoteResult<()>;

    async fn ad_groups(&self, campaign_id: CampaignId) -> RemoteResult<Vec<AdGroup>>;

    /// Updates ad groups that all belong to `campaign_id`.
    async fn update_ad_groups(
        &self,
        campaign_id: CampaignId,
        ad_groups: &[AdGroup],
    ) -> RemoteResult<()>;
}

/// Negative keyword lists in the account's shared library.
#[async_trait]
pub trait SharedListLibrary: Send + Sync {
    async fn negative_keyword_lists(&self) -> RemoteResult<Vec<NegativeKeywordList>>;

    async fn create_negative_keyword_list(&self, name: &str) -> RemoteResult<SharedEntityId>;

    async fn delete_negative_keyword_lists(&self, ids: &[SharedEntityId]) -> RemoteResult<()>;

    async fn negative_keywords(&self, list_id: SharedEntityId) -> RemoteResult<Vec<NegativeKeyword>>;

    async fn add_negative_keywords(
        &self,
        list_id: SharedEntityId,
        keywords: &[NegativeKeyword],
    ) -> RemoteResult<Vec<SharedEntityId>>;

    async fn delete_negative_keywords(
        &self,
        list_id: SharedEntityId,
        keyword_ids: &[SharedEntityId],
    ) -> RemoteResult<()>;

    /// Campaigns the list is currently attached to.
    async fn list_associations(&self, list_id: SharedEntityId) -> RemoteResult<Vec<CampaignId>>;

    async fn associate_lists(&self, pairs: &[(SharedEntityId, CampaignId)]) -> RemoteResult<()>;

    async fn disassociate_lists(&self, pairs: &[(SharedEntityId, CampaignId)]) -> RemoteResult<()>;
}
