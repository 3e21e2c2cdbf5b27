//! Three-way diff between a desired extension set and the remote library.
//!
//! Planning is pure: it takes both sides as values and produces the disjoint
//! action sets. The [`Reconciler`](crate::Reconciler) does the I/O around it.

use crate::error::{SyncError, SyncResult};
use crate::merge::merge;
use bingads_model::{AdExtension, ContentKey, KindPolicy, UpdateMode};
use bingads_types::{AdExtensionId, CampaignId, ExtensionKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// How repeated content keys in the desired set are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the pass with [`SyncError::DuplicateKey`] before any remote call.
    #[default]
    Reject,
    /// Keep the first occurrence of each key and skip the rest.
    KeepFirst,
}

/// Checks a desired set against the kind's policy and returns it with
/// duplicates resolved.
///
/// Runs before anything is fetched, so a rejected set never costs a remote
/// call.
pub fn prepare_desired(
    policy: &KindPolicy,
    desired: Vec<AdExtension>,
    duplicates: DuplicatePolicy,
    scope: &str,
) -> SyncResult<Vec<AdExtension>> {
    if desired.len() > policy.max_count {
        return Err(SyncError::QuotaExceeded {
            kind: policy.kind,
            scope: scope.to_string(),
            count: desired.len(),
            max: policy.max_count,
        });
    }

    for ext in &desired {
        if ext.kind() != policy.kind {
            return Err(SyncError::KindMismatch {
                expected: policy.kind,
                found: ext.kind(),
            });
        }
        ext.validate().map_err(|source| SyncError::InvalidExtension {
            kind: policy.kind,
            source,
        })?;
    }

    let mut seen = HashSet::with_capacity(desired.len());
    let mut unique = Vec::with_capacity(desired.len());
    for ext in desired {
        let key = ext.content_key();
        if seen.insert(key.clone()) {
            unique.push(ext);
            continue;
        }
        match duplicates {
            DuplicatePolicy::Reject => {
                return Err(SyncError::DuplicateKey {
                    kind: policy.kind,
                    key: key.to_string(),
                });
            }
            DuplicatePolicy::KeepFirst => {
                warn!("Skipping duplicate {} in desired set: {}", policy.kind, key);
            }
        }
    }
    Ok(unique)
}

/// The disjoint action sets of one reconciliation pass.
///
/// Content keys partition across `to_delete`, `to_create`, `to_keep` and
/// `to_update`. Every remote entry sits in exactly one of `to_delete`,
/// `redundant`, `to_keep`, `to_detach` or `untouched`, or is replaced by
/// its `to_update` entry (same id). `redundant` holds second and later
/// remote copies of a key, so its keys repeat keys of the other sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub kind: ExtensionKind,
    /// Remote extensions no desired entry matches.
    pub to_delete: Vec<AdExtension>,
    /// Extra remote copies of a key whose first copy is handled elsewhere.
    /// Deleted together with `to_delete`.
    pub redundant: Vec<AdExtension>,
    /// Desired extensions with no remote counterpart. They carry no id yet.
    pub to_create: Vec<AdExtension>,
    /// Remote extensions that already match a desired entry.
    pub to_keep: Vec<AdExtension>,
    /// Desired values that replace a remote extension, carrying its id.
    pub to_update: Vec<AdExtension>,
    /// Unmatched remote extensions that are still attached to campaigns
    /// outside a campaign-scoped pass. Only detached from the scope.
    pub to_detach: Vec<AdExtension>,
    /// The (extension, campaign) pairs to detach for `to_detach`.
    pub detach_pairs: Vec<(AdExtensionId, CampaignId)>,
    /// Unmatched remote extensions a campaign-scoped pass leaves alone
    /// because none of the scope's campaigns uses them.
    pub untouched: Vec<AdExtension>,
}

impl ReconcilePlan {
    /// Computes the plan for one kind.
    ///
    /// Both sides are sorted by content key and paired with [`merge`]. A key
    /// only on the remote side is deleted, a key only on the desired side is
    /// created, and a key on both sides is kept or updated depending on the
    /// kind's [`UpdateMode`]. Every key ends up in exactly one of the four
    /// sets; further remote copies of a key go to `redundant`.
    ///
    /// The plan covers the whole fetched library. Campaign-scoped passes
    /// narrow it with [`confine_to`](Self::confine_to).
    pub fn compute(
        policy: &KindPolicy,
        desired: Vec<AdExtension>,
        remote: Vec<AdExtension>,
    ) -> Self {
        let mut plan = Self {
            kind: policy.kind,
            to_delete: Vec::new(),
            redundant: Vec::new(),
            to_create: Vec::new(),
            to_keep: Vec::new(),
            to_update: Vec::new(),
            to_detach: Vec::new(),
            detach_pairs: Vec::new(),
            untouched: Vec::new(),
        };

        let (remote, redundant) = first_per_key(remote);
        for ext in &redundant {
            debug!("Remote {} {} duplicates another copy of its key", plan.kind, ext);
        }
        plan.redundant = redundant;
        let (desired, skipped) = first_per_key(desired);
        for ext in skipped {
            warn!("Skipping duplicate {} in desired set: {}", plan.kind, ext.content_key());
        }

        let mut merged = merge(remote, desired);
        merged.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, pair) in merged {
            match pair {
                (Some(remote), None) => plan.to_delete.push(remote),
                (None, Some(local)) => plan.to_create.push(local),
                (Some(remote), Some(mut local)) => match policy.update_mode {
                    UpdateMode::UpdateOnChange if !remote.content_eq(&local) => {
                        debug!("{} {} changed, updating", plan.kind, key);
                        local.set_id(remote.id());
                        plan.to_update.push(local);
                    }
                    _ => plan.to_keep.push(remote),
                },
                (None, None) => unreachable!("merge emits only keys present on one side"),
            }
        }

        plan
    }

    /// Narrows removals to what a campaign-scoped pass may touch.
    ///
    /// `attached` maps each removal candidate to every campaign it is
    /// attached to. A candidate whose campaigns all lie in `scope` stays
    /// deleted. One also attached elsewhere is only detached from the
    /// scope's campaigns, and one the scope does not use is left untouched.
    pub fn confine_to(
        &mut self,
        scope: &[CampaignId],
        attached: &HashMap<AdExtensionId, Vec<CampaignId>>,
    ) {
        let to_delete = std::mem::take(&mut self.to_delete);
        self.to_delete = self.confine_removals(to_delete, scope, attached);
        let redundant = std::mem::take(&mut self.redundant);
        self.redundant = self.confine_removals(redundant, scope, attached);
    }

    fn confine_removals(
        &mut self,
        removals: Vec<AdExtension>,
        scope: &[CampaignId],
        attached: &HashMap<AdExtensionId, Vec<CampaignId>>,
    ) -> Vec<AdExtension> {
        let mut deletable = Vec::with_capacity(removals.len());
        for ext in removals {
            let Some(id) = ext.id() else {
                self.untouched.push(ext);
                continue;
            };
            let campaigns = attached.get(&id).map(Vec::as_slice).unwrap_or_default();
            let inside: Vec<CampaignId> =
                campaigns.iter().copied().filter(|c| scope.contains(c)).collect();

            if inside.is_empty() {
                debug!("{} {} is not used in scope, leaving it", self.kind, ext);
                self.untouched.push(ext);
            } else if inside.len() == campaigns.len() {
                deletable.push(ext);
            } else {
                debug!(
                    "{} {} is still attached to {} other campaigns, detaching only",
                    self.kind,
                    ext,
                    campaigns.len() - inside.len()
                );
                self.detach_pairs.extend(inside.into_iter().map(|c| (id, c)));
                self.to_detach.push(ext);
            }
        }
        deletable
    }

    /// Ids of the extensions to delete, redundant copies included.
    pub fn delete_ids(&self) -> Vec<AdExtensionId> {
        self.to_delete
            .iter()
            .chain(&self.redundant)
            .filter_map(AdExtension::id)
            .collect()
    }

    /// True when applying the plan would only re-issue associations.
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty()
            && self.redundant.is_empty()
            && self.to_create.is_empty()
            && self.to_update.is_empty()
            && self.detach_pairs.is_empty()
    }

    /// Number of extensions that will be in effect after the pass.
    pub fn effective_len(&self) -> usize {
        self.to_create.len() + self.to_keep.len() + self.to_update.len()
    }
}

impl fmt::Display for ReconcilePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: delete {}, create {}, update {}, keep {}",
            self.kind,
            self.to_delete.len() + self.redundant.len(),
            self.to_create.len(),
            self.to_update.len(),
            self.to_keep.len()
        )?;
        if !self.to_detach.is_empty() {
            write!(f, ", detach {}", self.to_detach.len())?;
        }
        Ok(())
    }
}

/// Sorts by content key and splits off every entry whose key was already
/// seen. The split-off entries keep their relative order.
fn first_per_key(
    mut extensions: Vec<AdExtension>,
) -> (Vec<(ContentKey, AdExtension)>, Vec<AdExtension>) {
    extensions.sort_by_cached_key(AdExtension::content_key);

    let mut seen = HashSet::with_capacity(extensions.len());
    let mut first = Vec::with_capacity(extensions.len());
    let mut rest = Vec::new();
    for ext in extensions {
        let key = ext.content_key();
        if seen.insert(key.clone()) {
            first.push((key, ext));
        } else {
            rest.push(ext);
        }
    }
    (first, rest)
}
