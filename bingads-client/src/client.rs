//! JSON service client implementing the sync collaborator traits.

use crate::error::{ClientError, ClientResult};
use crate::session::{ServiceKind, Session};
use crate::wire::{
    AdExtensionAssociationCollection, AdExtensionIdToEntityId, AdExtensionIdentity, ApiFault,
    PartialErrors, SharedEntityAssociation, WireAdExtension, WireAdGroup, WireCampaign,
    WireNegativeKeyword, WireSharedEntity, WireUser, CAMPAIGN_ENTITY, NEGATIVE_KEYWORD_LIST,
};
use async_trait::async_trait;
use bingads_model::{AdExtension, AdGroup, Campaign, NegativeKeyword, NegativeKeywordList};
use bingads_sync::{CampaignDirectory, ExtensionLibrary, RemoteResult, SharedListLibrary};
use bingads_types::{
    AccountId, AdExtensionId, AssociationType, CampaignId, ExtensionKind, SharedEntityId, UserId,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Campaign types listed when enumerating campaigns.
const CAMPAIGN_TYPES: &str = "Search";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AdExtensionIdsResponse {
    ad_extension_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AdExtensionsResponse {
    ad_extensions: Vec<Option<WireAdExtension>>,
    #[serde(flatten)]
    errors: PartialErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AddAdExtensionsResponse {
    ad_extension_identities: Vec<Option<AdExtensionIdentity>>,
    #[serde(flatten)]
    errors: PartialErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AssociationsResponse {
    ad_extension_association_collection: Vec<Option<AdExtensionAssociationCollection>>,
    #[serde(flatten)]
    errors: PartialErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct CampaignsResponse {
    campaigns: Vec<WireCampaign>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AdGroupsResponse {
    ad_groups: Vec<WireAdGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct SharedEntitiesResponse {
    shared_entities: Vec<WireSharedEntity>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct AddSharedEntityResponse {
    shared_entity_id: Option<i64>,
    #[serde(flatten)]
    errors: PartialErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ListItemsResponse {
    list_items: Vec<WireNegativeKeyword>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ListItemIdsResponse {
    list_item_ids: Vec<Option<i64>>,
    #[serde(flatten)]
    errors: PartialErrors,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct SharedAssociationsResponse {
    associations: Vec<SharedEntityAssociation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct GetUserResponse {
    user: Option<WireUser>,
}

/// Bing Ads client over one [`Session`].
///
/// Every call is a single request; lists are sent whole and results are not
/// paged.
#[derive(Debug, Clone)]
pub struct BingAdsClient {
    session: Arc<Session>,
}

impl BingAdsClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn account_id(&self) -> ClientResult<AccountId> {
        self.session.config().require_account_id()
    }

    /// Sends one operation and decodes its response.
    ///
    /// Non-success statuses are decoded as service faults. An empty body
    /// decodes to the response type's default.
    async fn call<T: DeserializeOwned + Default>(
        &self,
        service: ServiceKind,
        method: Method,
        path: &str,
        operation: &'static str,
        body: &impl Serialize,
    ) -> ClientResult<T> {
        let url = self.session.service(service).endpoint(path);
        let token = self.session.access_token().await?;
        let config = self.session.config();

        let mut request = self
            .session
            .http()
            .request(method, &url)
            .bearer_auth(token)
            .header("DeveloperToken", &config.developer_token)
            .json(body);
        if let Some(customer_id) = config.customer_id {
            request = request.header("CustomerId", customer_id.to_string());
        }
        if let Some(account_id) = config.account_id {
            request = request.header("CustomerAccountId", account_id.to_string());
        }

        debug!("{operation}: {url}");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let messages = match serde_json::from_str::<ApiFault>(&text) {
                Ok(fault) => fault.messages(),
                Err(_) => Vec::new(),
            };
            let messages = if messages.is_empty() && !text.trim().is_empty() {
                vec![text.trim().to_string()]
            } else {
                messages
            };
            return Err(ClientError::Api {
                operation,
                status: status.as_u16(),
                messages,
            });
        }

        if text.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn check_partial(operation: &'static str, errors: &PartialErrors) -> ClientResult<()> {
        let messages = errors.messages();
        if messages.is_empty() {
            return Ok(());
        }
        Err(ClientError::Api { operation, status: 200, messages })
    }

    /// The signed-in user's id.
    pub async fn current_user_id(&self) -> ClientResult<UserId> {
        let response: GetUserResponse = self
            .call(
                ServiceKind::CustomerManagement,
                Method::POST,
                "User/Query",
                "GetUser",
                &json!({ "UserId": null }),
            )
            .await?;
        response
            .user
            .map(|u| UserId::new(u.id))
            .ok_or_else(|| ClientError::UnexpectedResponse("GetUser returned no user".to_string()))
    }

    // ── Ad extensions ────────────────────────────────────────────

    async fn extension_ids(
        &self,
        kind: ExtensionKind,
        filter: Option<AssociationType>,
    ) -> ClientResult<Vec<AdExtensionId>> {
        let response: AdExtensionIdsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "AdExtensionIds/QueryByAccountId",
                "GetAdExtensionIdsByAccountId",
                &json!({
                    "AccountId": self.account_id()?,
                    "AdExtensionType": kind.type_name(),
                    "AssociationType": filter.map(AssociationType::as_str),
                }),
            )
            .await?;
        Ok(response.ad_extension_ids.into_iter().map(AdExtensionId::new).collect())
    }

    async fn extensions_by_ids(
        &self,
        kind: ExtensionKind,
        ids: &[AdExtensionId],
    ) -> ClientResult<Vec<AdExtension>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let response: AdExtensionsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "AdExtensions/QueryByIds",
                "GetAdExtensionsByIds",
                &json!({
                    "AccountId": self.account_id()?,
                    "AdExtensionIds": ids,
                    "AdExtensionType": kind.type_name(),
                }),
            )
            .await?;
        Self::check_partial("GetAdExtensionsByIds", &response.errors)?;

        response
            .ad_extensions
            .into_iter()
            .flatten()
            .map(|wire| decode_extension(kind, wire))
            .collect()
    }

    async fn add_extensions(
        &self,
        kind: ExtensionKind,
        extensions: &[AdExtension],
    ) -> ClientResult<Vec<AdExtensionId>> {
        let wire: Vec<WireAdExtension> = extensions.iter().map(WireAdExtension::from).collect();
        let response: AddAdExtensionsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "AdExtensions",
                "AddAdExtensions",
                &json!({ "AccountId": self.account_id()?, "AdExtensions": wire }),
            )
            .await?;
        Self::check_partial("AddAdExtensions", &response.errors)?;
        debug!("Added {} {kind} extensions", response.ad_extension_identities.len());

        Ok(response
            .ad_extension_identities
            .into_iter()
            .flatten()
            .map(|identity| AdExtensionId::new(identity.id))
            .collect())
    }

    async fn write_extensions(
        &self,
        method: Method,
        operation: &'static str,
        body: serde_json::Value,
    ) -> ClientResult<()> {
        let response: PartialErrors = self
            .call(ServiceKind::CampaignManagement, method, "AdExtensions", operation, &body)
            .await?;
        Self::check_partial(operation, &response)
    }

    async fn write_associations(
        &self,
        method: Method,
        path: &str,
        operation: &'static str,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> ClientResult<()> {
        let associations: Vec<AdExtensionIdToEntityId> = pairs
            .iter()
            .map(|(ext, campaign)| AdExtensionIdToEntityId {
                ad_extension_id: ext.get(),
                entity_id: campaign.get(),
            })
            .collect();
        let response: PartialErrors = self
            .call(
                ServiceKind::CampaignManagement,
                method,
                path,
                operation,
                &json!({
                    "AccountId": self.account_id()?,
                    "AdExtensionIdToEntityIdAssociations": associations,
                    "AssociationType": AssociationType::Campaign.as_str(),
                }),
            )
            .await?;
        Self::check_partial(operation, &response)
    }

    async fn campaign_associations(
        &self,
        kind: ExtensionKind,
        campaign_ids: &[CampaignId],
    ) -> ClientResult<HashMap<CampaignId, Vec<AdExtension>>> {
        let response: AssociationsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "AdExtensionsAssociations/Query",
                "GetAdExtensionsAssociations",
                &json!({
                    "AccountId": self.account_id()?,
                    "AdExtensionType": kind.type_name(),
                    "AssociationType": AssociationType::Campaign.as_str(),
                    "EntityIds": campaign_ids,
                }),
            )
            .await?;
        Self::check_partial("GetAdExtensionsAssociations", &response.errors)?;

        let mut out: HashMap<CampaignId, Vec<AdExtension>> = HashMap::new();
        for collection in response.ad_extension_association_collection.into_iter().flatten() {
            for association in collection.ad_extension_associations {
                let Some(wire) = association.ad_extension else {
                    continue;
                };
                out.entry(CampaignId::new(association.entity_id))
                    .or_default()
                    .push(decode_extension(kind, wire)?);
            }
        }
        Ok(out)
    }

    // ── Campaigns ────────────────────────────────────────────────

    async fn list_campaigns(&self) -> ClientResult<Vec<Campaign>> {
        let response: CampaignsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "Campaigns/QueryByAccountId",
                "GetCampaignsByAccountId",
                &json!({ "AccountId": self.account_id()?, "CampaignType": CAMPAIGN_TYPES }),
            )
            .await?;
        Ok(response.campaigns.into_iter().filter_map(WireCampaign::into_model).collect())
    }

    async fn list_ad_groups(&self, campaign_id: CampaignId) -> ClientResult<Vec<AdGroup>> {
        let response: AdGroupsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "AdGroups/QueryByCampaignId",
                "GetAdGroupsByCampaignId",
                &json!({ "CampaignId": campaign_id }),
            )
            .await?;
        Ok(response
            .ad_groups
            .into_iter()
            .filter_map(|g| g.into_model(campaign_id))
            .collect())
    }

    // ── Shared lists ─────────────────────────────────────────────

    async fn list_shared(&self) -> ClientResult<Vec<NegativeKeywordList>> {
        let response: SharedEntitiesResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "SharedEntities/QueryByAccountId",
                "GetSharedEntitiesByAccountId",
                &json!({ "SharedEntityType": NEGATIVE_KEYWORD_LIST }),
            )
            .await?;
        Ok(response
            .shared_entities
            .into_iter()
            .filter(|e| e.entity_type == NEGATIVE_KEYWORD_LIST)
            .map(WireSharedEntity::into_model)
            .collect())
    }

    async fn write_list_associations(
        &self,
        method: Method,
        path: &str,
        operation: &'static str,
        pairs: &[(SharedEntityId, CampaignId)],
    ) -> ClientResult<()> {
        let associations: Vec<SharedEntityAssociation> = pairs
            .iter()
            .map(|&(list, campaign)| SharedEntityAssociation::campaign_list(list, campaign))
            .collect();
        let response: PartialErrors = self
            .call(
                ServiceKind::CampaignManagement,
                method,
                path,
                operation,
                &json!({ "Associations": associations }),
            )
            .await?;
        Self::check_partial(operation, &response)
    }
}

fn decode_extension(kind: ExtensionKind, wire: WireAdExtension) -> ClientResult<AdExtension> {
    let ext = AdExtension::try_from(wire)?;
    if ext.kind() != kind {
        return Err(ClientError::UnexpectedResponse(format!(
            "expected {kind} extension, service returned {}",
            ext.kind()
        )));
    }
    Ok(ext)
}

#[async_trait]
impl ExtensionLibrary for BingAdsClient {
    async fn fetch(
        &self,
        kind: ExtensionKind,
        filter: Option<AssociationType>,
    ) -> RemoteResult<Vec<AdExtension>> {
        let ids = self.extension_ids(kind, filter).await?;
        Ok(self.extensions_by_ids(kind, &ids).await?)
    }

    async fn create(
        &self,
        kind: ExtensionKind,
        extensions: &[AdExtension],
    ) -> RemoteResult<Vec<AdExtensionId>> {
        Ok(self.add_extensions(kind, extensions).await?)
    }

    async fn update(&self, _kind: ExtensionKind, extensions: &[AdExtension]) -> RemoteResult<()> {
        let wire: Vec<WireAdExtension> = extensions.iter().map(WireAdExtension::from).collect();
        let body = json!({ "AccountId": self.account_id()?, "AdExtensions": wire });
        Ok(self.write_extensions(Method::PUT, "UpdateAdExtensions", body).await?)
    }

    async fn delete(&self, _kind: ExtensionKind, ids: &[AdExtensionId]) -> RemoteResult<()> {
        let body = json!({ "AccountId": self.account_id()?, "AdExtensionIds": ids });
        Ok(self.write_extensions(Method::DELETE, "DeleteAdExtensions", body).await?)
    }

    async fn associate(
        &self,
        _kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> RemoteResult<()> {
        Ok(self
            .write_associations(
                Method::POST,
                "AdExtensionsAssociations/Set",
                "SetAdExtensionsAssociations",
                pairs,
            )
            .await?)
    }

    async fn disassociate(
        &self,
        _kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> RemoteResult<()> {
        Ok(self
            .write_associations(
                Method::DELETE,
                "AdExtensionsAssociations",
                "DeleteAdExtensionsAssociations",
                pairs,
            )
            .await?)
    }

    async fn associations(
        &self,
        kind: ExtensionKind,
        campaign_ids: &[CampaignId],
    ) -> RemoteResult<HashMap<CampaignId, Vec<AdExtension>>> {
        Ok(self.campaign_associations(kind, campaign_ids).await?)
    }

    async fn extension_campaigns(
        &self,
        kind: ExtensionKind,
        ids: &[AdExtensionId],
    ) -> RemoteResult<HashMap<AdExtensionId, Vec<CampaignId>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let campaign_ids: Vec<CampaignId> =
            self.list_campaigns().await?.into_iter().map(|c| c.id).collect();
        if campaign_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut out: HashMap<AdExtensionId, Vec<CampaignId>> = HashMap::new();
        for (campaign, extensions) in self.campaign_associations(kind, &campaign_ids).await? {
            for id in extensions.iter().filter_map(AdExtension::id) {
                if ids.contains(&id) {
                    out.entry(id).or_default().push(campaign);
                }
            }
        }
        for campaigns in out.values_mut() {
            campaigns.sort();
        }
        Ok(out)
    }
}

#[async_trait]
impl CampaignDirectory for BingAdsClient {
    async fn campaigns(&self) -> RemoteResult<Vec<Campaign>> {
        Ok(self.list_campaigns().await?)
    }

    async fn update_campaigns(&self, campaigns: &[Campaign]) -> RemoteResult<()> {
        let wire: Vec<WireCampaign> = campaigns.iter().map(WireCampaign::status_update).collect();
        let response: PartialErrors = self
            .call(
                ServiceKind::CampaignManagement,
                Method::PUT,
                "Campaigns",
                "UpdateCampaigns",
                &json!({ "AccountId": self.account_id()?, "Campaigns": wire }),
            )
            .await?;
        Ok(Self::check_partial("UpdateCampaigns", &response)?)
    }

    async fn ad_groups(&self, campaign_id: CampaignId) -> RemoteResult<Vec<AdGroup>> {
        Ok(self.list_ad_groups(campaign_id).await?)
    }

    async fn update_ad_groups(
        &self,
        campaign_id: CampaignId,
        ad_groups: &[AdGroup],
    ) -> RemoteResult<()> {
        let wire: Vec<WireAdGroup> = ad_groups.iter().map(WireAdGroup::status_update).collect();
        let response: PartialErrors = self
            .call(
                ServiceKind::CampaignManagement,
                Method::PUT,
                "AdGroups",
                "UpdateAdGroups",
                &json!({ "CampaignId": campaign_id, "AdGroups": wire }),
            )
            .await?;
        Ok(Self::check_partial("UpdateAdGroups", &response)?)
    }
}

#[async_trait]
impl SharedListLibrary for BingAdsClient {
    async fn negative_keyword_lists(&self) -> RemoteResult<Vec<NegativeKeywordList>> {
        Ok(self.list_shared().await?)
    }

    async fn create_negative_keyword_list(&self, name: &str) -> RemoteResult<SharedEntityId> {
        let response: AddSharedEntityResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "SharedEntity",
                "AddSharedEntity",
                &json!({ "SharedEntity": WireSharedEntity::negative_keyword_list(None, Some(name)) }),
            )
            .await?;
        Self::check_partial("AddSharedEntity", &response.errors)?;
        let id = response.shared_entity_id.ok_or_else(|| {
            ClientError::UnexpectedResponse("AddSharedEntity returned no id".to_string())
        })?;
        Ok(SharedEntityId::new(id))
    }

    async fn delete_negative_keyword_lists(&self, ids: &[SharedEntityId]) -> RemoteResult<()> {
        let lists: Vec<WireSharedEntity> = ids
            .iter()
            .map(|&id| WireSharedEntity::negative_keyword_list(Some(id), None))
            .collect();
        let response: PartialErrors = self
            .call(
                ServiceKind::CampaignManagement,
                Method::DELETE,
                "SharedEntities",
                "DeleteSharedEntities",
                &json!({ "SharedEntities": lists }),
            )
            .await?;
        Ok(Self::check_partial("DeleteSharedEntities", &response)?)
    }

    async fn negative_keywords(&self, list_id: SharedEntityId) -> RemoteResult<Vec<NegativeKeyword>> {
        let response: ListItemsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "ListItems/QueryBySharedList",
                "GetListItemsBySharedList",
                &json!({ "SharedList": WireSharedEntity::negative_keyword_list(Some(list_id), None) }),
            )
            .await?;
        Ok(response.list_items.into_iter().map(NegativeKeyword::from).collect())
    }

    async fn add_negative_keywords(
        &self,
        list_id: SharedEntityId,
        keywords: &[NegativeKeyword],
    ) -> RemoteResult<Vec<SharedEntityId>> {
        let items: Vec<WireNegativeKeyword> = keywords.iter().map(WireNegativeKeyword::from).collect();
        let response: ListItemIdsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "ListItems",
                "AddListItemsToSharedList",
                &json!({
                    "SharedList": WireSharedEntity::negative_keyword_list(Some(list_id), None),
                    "ListItems": items,
                }),
            )
            .await?;
        Self::check_partial("AddListItemsToSharedList", &response.errors)?;
        Ok(response
            .list_item_ids
            .into_iter()
            .flatten()
            .map(SharedEntityId::new)
            .collect())
    }

    async fn delete_negative_keywords(
        &self,
        list_id: SharedEntityId,
        keyword_ids: &[SharedEntityId],
    ) -> RemoteResult<()> {
        let response: PartialErrors = self
            .call(
                ServiceKind::CampaignManagement,
                Method::DELETE,
                "ListItems",
                "DeleteListItemsFromSharedList",
                &json!({
                    "SharedList": WireSharedEntity::negative_keyword_list(Some(list_id), None),
                    "ListItemIds": keyword_ids,
                }),
            )
            .await?;
        Ok(Self::check_partial("DeleteListItemsFromSharedList", &response)?)
    }

    async fn list_associations(&self, list_id: SharedEntityId) -> RemoteResult<Vec<CampaignId>> {
        let response: SharedAssociationsResponse = self
            .call(
                ServiceKind::CampaignManagement,
                Method::POST,
                "SharedEntityAssociations/QueryBySharedEntityIds",
                "GetSharedEntityAssociationsBySharedEntityIds",
                &json!({
                    "EntityType": CAMPAIGN_ENTITY,
                    "SharedEntityIds": [list_id],
                    "SharedEntityType": NEGATIVE_KEYWORD_LIST,
                }),
            )
            .await?;
        Ok(response
            .associations
            .into_iter()
            .filter(|a| a.shared_entity_id == list_id.get() && a.entity_type == CAMPAIGN_ENTITY)
            .map(|a| CampaignId::new(a.entity_id))
            .collect())
    }

    async fn associate_lists(&self, pairs: &[(SharedEntityId, CampaignId)]) -> RemoteResult<()> {
        Ok(self
            .write_list_associations(
                Method::POST,
                "SharedEntityAssociations/Set",
                "SetSharedEntityAssociations",
                pairs,
            )
            .await?)
    }

    async fn disassociate_lists(&self, pairs: &[(SharedEntityId, CampaignId)]) -> RemoteResult<()> {
        Ok(self
            .write_list_associations(
                Method::DELETE,
                "SharedEntityAssociations",
                "DeleteSharedEntityAssociations",
                pairs,
            )
            .await?)
    }
}
