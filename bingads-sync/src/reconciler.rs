//! Reconciler: fetches, plans and applies one pass for one extension kind.

use crate::error::{Step, Subject, SyncError, SyncResult};
use crate::library::ExtensionLibrary;
use crate::plan::{prepare_desired, DuplicatePolicy, ReconcilePlan};
use bingads_model::{AdExtension, KindPolicy};
use bingads_types::{AdExtensionId, AssociationType, CampaignId, ExtensionKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for the reconciler.
#[derive(Debug, Clone, Default)]
pub struct ReconcileConfig {
    /// Treatment of repeated content keys in a desired set.
    pub duplicate_policy: DuplicatePolicy,
    /// Per-kind overrides. Kinds without an entry use
    /// [`KindPolicy::for_kind`].
    pub policies: HashMap<ExtensionKind, KindPolicy>,
}

impl ReconcileConfig {
    /// The effective policy for `kind`.
    pub fn policy(&self, kind: ExtensionKind) -> KindPolicy {
        self.policies
            .get(&kind)
            .copied()
            .unwrap_or_else(|| KindPolicy::for_kind(kind))
    }

    #[must_use]
    pub fn with_policy(mut self, policy: KindPolicy) -> Self {
        self.policies.insert(policy.kind, policy);
        self
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }
}

/// The containers a pass (re-)associates its extensions with.
///
/// The reconciler never discovers campaigns on its own; whatever is listed
/// here is exactly what gets associated. Unmatched remote extensions are
/// deleted outright only when the scope covers the whole account (the
/// library scope, or every campaign). A campaign-scoped pass deletes only
/// what no other campaign uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileScope {
    pub campaigns: Vec<CampaignId>,
    /// Set when `campaigns` is every campaign of the account.
    pub whole_account: bool,
}

impl ReconcileScope {
    pub fn campaigns(ids: impl IntoIterator<Item = CampaignId>) -> Self {
        Self { campaigns: ids.into_iter().collect(), whole_account: false }
    }

    /// Scope over every campaign of the account, as listed by the caller.
    pub fn all_campaigns(ids: impl IntoIterator<Item = CampaignId>) -> Self {
        Self { campaigns: ids.into_iter().collect(), whole_account: true }
    }

    /// Library-only scope: nothing is associated.
    pub fn library() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    /// True when removals may delete without checking other campaigns.
    pub fn covers_account(&self) -> bool {
        self.whole_account || self.campaigns.is_empty()
    }
}

impl fmt::Display for ReconcileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.campaigns.as_slice() {
            [] => f.write_str("account library"),
            many if self.whole_account => write!(f, "all {} campaigns", many.len()),
            [only] => write!(f, "campaign {only}"),
            many => write!(f, "{} campaigns", many.len()),
        }
    }
}

/// What a completed pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub kind: ExtensionKind,
    /// Extensions in effect after the pass, all with ids, sorted by content key.
    pub extensions: Vec<AdExtension>,
    pub deleted: Vec<AdExtensionId>,
    /// Unmatched extensions detached from the scope but kept for other
    /// campaigns.
    pub detached: Vec<AdExtensionId>,
    pub created: usize,
    pub updated: usize,
    pub kept: usize,
    /// Number of (extension, campaign) pairs sent for association.
    pub associated: usize,
}

/// Synchronizes desired extension sets against the account library.
pub struct Reconciler {
    library: Arc<dyn ExtensionLibrary>,
    config: ReconcileConfig,
}

impl Reconciler {
    /// Creates a reconciler with default per-kind policies.
    pub fn new(library: Arc<dyn ExtensionLibrary>) -> Self {
        Self::with_config(library, ReconcileConfig::default())
    }

    pub fn with_config(library: Arc<dyn ExtensionLibrary>, config: ReconcileConfig) -> Self {
        Self { library, config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Validates `desired`, fetches the remote library and computes the plan
    /// without changing anything remotely.
    pub async fn plan(
        &self,
        kind: ExtensionKind,
        desired: Vec<AdExtension>,
        scope: &ReconcileScope,
    ) -> SyncResult<ReconcilePlan> {
        let policy = self.config.policy(kind);
        let desired =
            prepare_desired(&policy, desired, self.config.duplicate_policy, &scope.to_string())?;

        if scope.is_empty() && policy.fetch_filter.is_some() {
            warn!(
                "Reconciling {kind} with no campaigns in scope; new extensions will stay unassociated \
                 and invisible to the next fetch"
            );
        }

        let remote = self
            .library
            .fetch(kind, policy.fetch_filter)
            .await
            .map_err(SyncError::remote(Subject::Extension(kind), Step::Fetch))?;
        debug!("Fetched {} remote {kind} extensions", remote.len());

        let mut plan = ReconcilePlan::compute(&policy, desired, remote);

        let candidates = plan.delete_ids();
        if !scope.covers_account() && !candidates.is_empty() {
            let attached = self
                .library
                .extension_campaigns(kind, &candidates)
                .await
                .map_err(SyncError::remote(Subject::Extension(kind), Step::Fetch))?;
            plan.confine_to(&scope.campaigns, &attached);
        }

        info!("Planned {plan} for {scope}");
        Ok(plan)
    }

    /// Runs one full pass: plan, then delete, create, update and associate,
    /// in that order.
    pub async fn reconcile(
        &self,
        kind: ExtensionKind,
        desired: Vec<AdExtension>,
        scope: &ReconcileScope,
    ) -> SyncResult<ReconcileOutcome> {
        let plan = self.plan(kind, desired, scope).await?;
        self.apply(plan, scope).await
    }

    /// Applies a computed plan.
    ///
    /// Deletes and detaches go first so the service frees quota (and drops
    /// the deleted extensions' associations) before inserts. A failure stops
    /// the pass; earlier steps stay applied.
    pub async fn apply(
        &self,
        plan: ReconcilePlan,
        scope: &ReconcileScope,
    ) -> SyncResult<ReconcileOutcome> {
        let kind = plan.kind;
        let subject = Subject::Extension(kind);
        let deleted = plan.delete_ids();
        let ReconcilePlan {
            to_delete,
            redundant,
            mut to_create,
            to_keep,
            to_update,
            to_detach,
            detach_pairs,
            ..
        } = plan;

        let removals = to_delete.len() + redundant.len();
        if deleted.len() < removals {
            warn!("{} remote {kind} extensions without id cannot be deleted", removals - deleted.len());
        }
        if !deleted.is_empty() {
            debug!("Deleting {} {kind} extensions", deleted.len());
            self.library
                .delete(kind, &deleted)
                .await
                .map_err(SyncError::remote(subject, Step::Delete))?;
        }

        let detached: Vec<AdExtensionId> = to_detach.iter().filter_map(AdExtension::id).collect();
        if !detach_pairs.is_empty() {
            debug!("Detaching {} {kind} extensions used by other campaigns", detached.len());
            self.library
                .disassociate(kind, &detach_pairs)
                .await
                .map_err(SyncError::remote(subject, Step::Disassociate))?;
        }

        if !to_create.is_empty() {
            debug!("Creating {} {kind} extensions", to_create.len());
            let ids = self
                .library
                .create(kind, &to_create)
                .await
                .map_err(SyncError::remote(subject, Step::Create))?;
            if ids.len() != to_create.len() {
                return Err(SyncError::RemoteCallFailed {
                    subject,
                    step: Step::Create,
                    source: format!(
                        "service returned {} ids for {} created extensions",
                        ids.len(),
                        to_create.len()
                    )
                    .into(),
                });
            }
            for (ext, id) in to_create.iter_mut().zip(ids) {
                ext.set_id(Some(id));
            }
        }

        if !to_update.is_empty() {
            debug!("Updating {} {kind} extensions", to_update.len());
            self.library
                .update(kind, &to_update)
                .await
                .map_err(SyncError::remote(subject, Step::Update))?;
        }

        let (created, updated, kept) = (to_create.len(), to_update.len(), to_keep.len());
        let mut extensions: Vec<AdExtension> =
            to_create.into_iter().chain(to_keep).chain(to_update).collect();
        extensions.sort_by_cached_key(AdExtension::content_key);

        let pairs: Vec<(AdExtensionId, CampaignId)> = scope
            .campaigns
            .iter()
            .flat_map(|&campaign| {
                extensions
                    .iter()
                    .filter_map(AdExtension::id)
                    .map(move |id| (id, campaign))
            })
            .collect();
        if !pairs.is_empty() {
            debug!("Associating {} {kind} extension/campaign pairs", pairs.len());
            self.library
                .associate(kind, &pairs)
                .await
                .map_err(SyncError::remote(subject, Step::Associate))?;
        }

        info!(
            "Reconciled {kind} for {scope}: {} deleted, {} detached, {created} created, {updated} updated, {kept} kept",
            deleted.len(),
            detached.len()
        );

        Ok(ReconcileOutcome {
            kind,
            extensions,
            deleted,
            detached,
            created,
            updated,
            kept,
            associated: pairs.len(),
        })
    }

    /// Lists the remote extensions of `kind` visible under its fetch policy.
    pub async fn list(&self, kind: ExtensionKind) -> SyncResult<Vec<AdExtension>> {
        let filter = self.config.policy(kind).fetch_filter;
        self.library
            .fetch(kind, filter)
            .await
            .map_err(SyncError::remote(Subject::Extension(kind), Step::Fetch))
    }

    /// Extensions of `kind` attached to each campaign.
    pub async fn associations(
        &self,
        kind: ExtensionKind,
        campaign_ids: &[CampaignId],
    ) -> SyncResult<HashMap<CampaignId, Vec<AdExtension>>> {
        if campaign_ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.library
            .associations(kind, campaign_ids)
            .await
            .map_err(SyncError::remote(Subject::Extension(kind), Step::Fetch))
    }

    /// Deletes every extension of `kind` matching `filter` (`None` for the
    /// whole library). Returns the deleted ids.
    pub async fn delete_all(
        &self,
        kind: ExtensionKind,
        filter: Option<AssociationType>,
    ) -> SyncResult<Vec<AdExtensionId>> {
        let subject = Subject::Extension(kind);
        let ids: Vec<AdExtensionId> = self
            .library
            .fetch(kind, filter)
            .await
            .map_err(SyncError::remote(subject, Step::Fetch))?
            .iter()
            .filter_map(AdExtension::id)
            .collect();

        info!("Deleting {} {kind} extensions", ids.len());
        if !ids.is_empty() {
            self.library
                .delete(kind, &ids)
                .await
                .map_err(SyncError::remote(subject, Step::Delete))?;
        }
        Ok(ids)
    }

    /// Detaches extensions from campaigns, leaving them in the library.
    pub async fn detach(
        &self,
        kind: ExtensionKind,
        pairs: &[(AdExtensionId, CampaignId)],
    ) -> SyncResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        self.library
            .disassociate(kind, pairs)
            .await
            .map_err(SyncError::remote(Subject::Extension(kind), Step::Disassociate))
    }
}
