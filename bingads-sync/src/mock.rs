//! An in-memory remote for testing.
//!
//! [`MockRemote`] implements every collaborator trait over plain maps,
//! mirrors the service's association semantics (deleting an extension drops
//! its associations, re-associating is a no-op) and records each call so
//! tests can assert on what was sent.

use crate::error::{RemoteResult, Step};
use crate::library::{CampaignDirectory, ExtensionLibrary, SharedListLibrary};
use async_trait::async_trait;
use bingads_model::{AdExtension, AdGroup, Campaign, NegativeKeyword, NegativeKeywordList};
use bingads_types::{AdExtensionId, AssociationType, CampaignId, ExtensionKind, SharedEntityId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Fetch(ExtensionKind),
    Create(ExtensionKind, Vec<AdExtension>),
    Update(ExtensionKind, Vec<AdExtension>),
    Delete(ExtensionKind, Vec<AdExtensionId>),
    Associate(ExtensionKind, Vec<(AdExtensionId, CampaignId)>),
    Disassociate(ExtensionKind, Vec<(AdExtensionId, CampaignId)>),
    Associations(ExtensionKind, Vec<CampaignId>),
    ExtensionCampaigns(ExtensionKind, Vec<AdExtensionId>),
    Campaigns,
    UpdateCampaigns(Vec<Campaign>),
    AdGroups(CampaignId),
    UpdateAdGroups(CampaignId, Vec<AdGroup>),
    SharedLists,
    SharedListWrite(Step),
}

impl RemoteCall {
    /// True for calls that change remote state other than associations.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Create(..) | Self::Update(..) | Self::Delete(..))
    }
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    extensions: BTreeMap<AdExtensionId, AdExtension>,
    associations: BTreeMap<AdExtensionId, BTreeSet<CampaignId>>,
    campaigns: Vec<Campaign>,
    ad_groups: Vec<AdGroup>,
    lists: BTreeMap<SharedEntityId, NegativeKeywordList>,
    keywords: BTreeMap<SharedEntityId, Vec<NegativeKeyword>>,
    list_associations: BTreeMap<SharedEntityId, BTreeSet<CampaignId>>,
    calls: Vec<RemoteCall>,
    fail_at: Option<Step>,
    short_create: bool,
}

impl State {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, step: Step) -> RemoteResult<()> {
        if self.fail_at == Some(step) {
            return Err(format!("injected {step} failure").into());
        }
        Ok(())
    }
}

/// In-memory stand-in for the remote service.
#[derive(Debug)]
pub struct MockRemote {
    state: Mutex<State>,
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemote {
    /// Creates an empty remote. Ids are allocated from 1001 upwards.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
        }
    }

    /// Adds an extension to the library, attached to `campaigns`. Returns
    /// its new id.
    pub fn seed(&self, mut extension: AdExtension, campaigns: &[CampaignId]) -> AdExtensionId {
        let mut state = self.state.lock().unwrap();
        let id = AdExtensionId::new(state.allocate());
        extension.set_id(Some(id));
        state.extensions.insert(id, extension);
        state
            .associations
            .insert(id, campaigns.iter().copied().collect());
        id
    }

    pub fn seed_campaign(&self, campaign: Campaign) {
        self.state.lock().unwrap().campaigns.push(campaign);
    }

    pub fn seed_ad_group(&self, ad_group: AdGroup) {
        self.state.lock().unwrap().ad_groups.push(ad_group);
    }

    pub fn seed_list(&self, name: &str, campaigns: &[CampaignId]) -> SharedEntityId {
        let mut state = self.state.lock().unwrap();
        let id = SharedEntityId::new(state.allocate());
        state.lists.insert(id, NegativeKeywordList { id: Some(id), name: name.to_string() });
        state
            .list_associations
            .insert(id, campaigns.iter().copied().collect());
        id
    }

    /// Makes every subsequent call of `step` fail.
    pub fn fail_at(&self, step: Step) {
        self.state.lock().unwrap().fail_at = Some(step);
    }

    /// Makes `create` return one id fewer than requested.
    pub fn return_short_create(&self) {
        self.state.lock().unwrap().short_create = true;
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Current library contents of `kind`, ordered by id.
    pub fn extensions(&self, kind: ExtensionKind) -> Vec<AdExtension> {
        let state = self.state.lock().unwrap();
        state
            .extensions
            .values()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    /// Campaigns an extension is attached to.
    pub fn associated_campaigns(&self, id: AdExtensionId) -> Vec<CampaignId> {
        let state = self.state.lock().unwrap();
        state
            .associations
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn campaign(&self, id: CampaignId) -> Option<Campaign> {
        let state = self.state.lock().unwrap();
        state.campaigns.iter().find(|c| c.id == id).cloned()
    }

    pub fn ad_group(&self, id: bingads_types::AdGroupId) -> Option<AdGroup> {
        let state = self.state.lock().unwrap();
        state.ad_groups.iter().find(|g| g.id == id).cloned()
    }

    pub fn lists(&self) -> Vec<NegativeKeywordList> {
        self.state.lock().unwrap().lists.values().cloned().collect()
    }

    pub fn list_campaigns(&self, id: SharedEntityId) -> Vec<CampaignId> {
        let state = self.state.lock().unwrap();
        state
            .list_associations
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExtensionLibrary for MockRemote {
    async fn fetch(
        &self,
        kind: ExtensionKind,
        filter: Option<AssociationType>,
    ) -> RemoteResult<Vec<AdExtension>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Fetch(kind));
        state.check(Step::Fetch)?;
        Ok(state
            .extensions
            .iter()
            .filter(|(_, e)| e.kind() == kind)
            .filter(|(id, _)| match filter {
                Some(AssociationType::Campaign) => {
                    state.associations.get(*id).is_some_and(|set| !set.is_empty())
                }
                _ => true,
            })
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn create(
        &self,
        kind: ExtensionKind,
        extensions: &[AdExtension],
    ) -> RemoteResult<Vec<AdExtensionId>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Create(kind, extensions.to_vec()));
        state.check(Step::Create)?;
        let mut ids = Vec::with_capacity(extensions.len());
        for ext in extensions {
            let id = AdExtensionId::new(state.allocate());
            state.extensions.insert(id, ext.clone().with_id(id));
            state.associations.insert(id, BTreeSet::new());
            ids.push(id);
        }
        if state.short_create {
            ids.pop();
        }
        Ok(ids)
    }

    async fn update(&self, kind: ExtensionKind, extensions: &[AdExtension]) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Update(kind, extensions.to_vec()));
        state.check(Step::Update)?;
        for ext in extensions {
            let id = ext.id().ok_or("update without id")?;
            if !state.extensions.contains_key(&id) {
                return Err(format!("unknown ad extension {id}").into());
            }
            state.extensions.insert(id, ext.clone());
        }
        Ok(())
    }

    async fn delete(&self, kind: ExtensionKind, ids: &[AdExtensionId]) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Delete(kind, ids.to_vec()));
        state.check(Step::Delete)?;
        for id in ids {
            state.extensions.remove(id);
            state.associations.remove(id);
        }
        Ok(())
    }

    async fn associate(
        &self,
        kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Associate(kind, pairs.to_vec()));
        state.check(Step::Associate)?;
        for (id, campaign) in pairs {
            state.associations.entry(*id).or_default().insert(*campaign);
        }
        Ok(())
    }

    async fn disassociate(
        &self,
        kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Disassociate(kind, pairs.to_vec()));
        state.check(Step::Disassociate)?;
        for (id, campaign) in pairs {
            if let Some(set) = state.associations.get_mut(id) {
                set.remove(campaign);
            }
        }
        Ok(())
    }

    async fn associations(
        &self,
        kind: ExtensionKind,
        campaign_ids: &[CampaignId],
    ) -> RemoteResult<HashMap<CampaignId, Vec<AdExtension>>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Associations(kind, campaign_ids.to_vec()));
        state.check(Step::Fetch)?;
        let mut out: HashMap<CampaignId, Vec<AdExtension>> = HashMap::new();
        for (id, campaigns) in &state.associations {
            let Some(ext) = state.extensions.get(id).filter(|e| e.kind() == kind) else {
                continue;
            };
            for campaign in campaigns.iter().filter(|c| campaign_ids.contains(c)) {
                out.entry(*campaign).or_default().push(ext.clone());
            }
        }
        Ok(out)
    }

    async fn extension_campaigns(
        &self,
        kind: ExtensionKind,
        ids: &[AdExtensionId],
    ) -> RemoteResult<HashMap<AdExtensionId, Vec<CampaignId>>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::ExtensionCampaigns(kind, ids.to_vec()));
        state.check(Step::Fetch)?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                let campaigns = state.associations.get(id)?;
                Some((*id, campaigns.iter().copied().collect()))
            })
            .collect())
    }
}

#[async_trait]
impl CampaignDirectory for MockRemote {
    async fn campaigns(&self) -> RemoteResult<Vec<Campaign>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::Campaigns);
        state.check(Step::Fetch)?;
        Ok(state.campaigns.clone())
    }

    async fn update_campaigns(&self, campaigns: &[Campaign]) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::UpdateCampaigns(campaigns.to_vec()));
        state.check(Step::Update)?;
        for update in campaigns {
            if let Some(existing) = state.campaigns.iter_mut().find(|c| c.id == update.id) {
                *existing = update.clone();
            }
        }
        Ok(())
    }

    async fn ad_groups(&self, campaign_id: CampaignId) -> RemoteResult<Vec<AdGroup>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::AdGroups(campaign_id));
        state.check(Step::Fetch)?;
        Ok(state
            .ad_groups
            .iter()
            .filter(|g| g.campaign_id == campaign_id)
            .cloned()
            .collect())
    }

    async fn update_ad_groups(
        &self,
        campaign_id: CampaignId,
        ad_groups: &[AdGroup],
    ) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(RemoteCall::UpdateAdGroups(campaign_id, ad_groups.to_vec()));
        state.check(Step::Update)?;
        for update in ad_groups {
            if update.campaign_id != campaign_id {
                return Err(format!("ad group {} is not in campaign {campaign_id}", update.id).into());
            }
            if let Some(existing) = state.ad_groups.iter_mut().find(|g| g.id == update.id) {
                *existing = update.clone();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SharedListLibrary for MockRemote {
    async fn negative_keyword_lists(&self) -> RemoteResult<Vec<NegativeKeywordList>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedLists);
        state.check(Step::Fetch)?;
        Ok(state.lists.values().cloned().collect())
    }

    async fn create_negative_keyword_list(&self, name: &str) -> RemoteResult<SharedEntityId> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedListWrite(Step::Create));
        state.check(Step::Create)?;
        let id = SharedEntityId::new(state.allocate());
        state.lists.insert(id, NegativeKeywordList { id: Some(id), name: name.to_string() });
        Ok(id)
    }

    async fn delete_negative_keyword_lists(&self, ids: &[SharedEntityId]) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedListWrite(Step::Delete));
        state.check(Step::Delete)?;
        for id in ids {
            state.lists.remove(id);
            state.keywords.remove(id);
            state.list_associations.remove(id);
        }
        Ok(())
    }

    async fn negative_keywords(&self, list_id: SharedEntityId) -> RemoteResult<Vec<NegativeKeyword>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedLists);
        state.check(Step::Fetch)?;
        Ok(state.keywords.get(&list_id).cloned().unwrap_or_default())
    }

    async fn add_negative_keywords(
        &self,
        list_id: SharedEntityId,
        keywords: &[NegativeKeyword],
    ) -> RemoteResult<Vec<SharedEntityId>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedListWrite(Step::Create));
        state.check(Step::Create)?;
        if !state.lists.contains_key(&list_id) {
            return Err(format!("unknown negative keyword list {list_id}").into());
        }
        let mut ids = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let id = SharedEntityId::new(state.allocate());
            let mut stored = keyword.clone();
            stored.id = Some(id);
            state.keywords.entry(list_id).or_default().push(stored);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn delete_negative_keywords(
        &self,
        list_id: SharedEntityId,
        keyword_ids: &[SharedEntityId],
    ) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedListWrite(Step::Delete));
        state.check(Step::Delete)?;
        if let Some(items) = state.keywords.get_mut(&list_id) {
            items.retain(|k| k.id.is_none_or(|id| !keyword_ids.contains(&id)));
        }
        Ok(())
    }

    async fn list_associations(&self, list_id: SharedEntityId) -> RemoteResult<Vec<CampaignId>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedLists);
        state.check(Step::Fetch)?;
        Ok(state
            .list_associations
            .get(&list_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn associate_lists(&self, pairs: &[(SharedEntityId, CampaignId)]) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedListWrite(Step::Associate));
        state.check(Step::Associate)?;
        for (list, campaign) in pairs {
            state.list_associations.entry(*list).or_default().insert(*campaign);
        }
        Ok(())
    }

    async fn disassociate_lists(&self, pairs: &[(SharedEntityId, CampaignId)]) -> RemoteResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RemoteCall::SharedListWrite(Step::Disassociate));
        state.check(Step::Disassociate)?;
        for (list, campaign) in pairs {
            if let Some(set) = state.list_associations.get_mut(list) {
                set.remove(campaign);
            }
        }
        Ok(())
    }
}
