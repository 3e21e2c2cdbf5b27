use bingads_model::{AdExtension, Callout, KindPolicy, Sitelink};
use bingads_sync::mock::MockRemote;
use bingads_sync::{ReconcilePlan, ReconcileScope, Reconciler};
use bingads_types::{CampaignId, ExtensionKind};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

fn texts(exts: &[AdExtension]) -> BTreeSet<String> {
    exts.iter()
        .filter_map(|e| match e {
            AdExtension::Callout(c) => Some(c.text.clone()),
            _ => None,
        })
        .collect()
}

type SitelinkView = BTreeMap<String, (Option<String>, Option<String>)>;

fn sitelinks(exts: &[AdExtension]) -> SitelinkView {
    exts.iter()
        .filter_map(|e| match e {
            AdExtension::Sitelink(s) => Some((
                s.display_text.clone(),
                (s.description1.clone(), s.description2.clone()),
            )),
            _ => None,
        })
        .collect()
}

fn sitelink(text: &str, d1: &str, d2: &str) -> AdExtension {
    Sitelink::new(text, format!("http://x/{text}"))
        .with_descriptions(d1, d2)
        .into()
}

fn attachment(choice: u8) -> Vec<CampaignId> {
    match choice {
        0 => vec![CampaignId::new(1)],
        1 => vec![CampaignId::new(2)],
        _ => vec![CampaignId::new(1), CampaignId::new(2)],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// After a pass the remote holds exactly the desired keys, and a second
    /// pass with the same input mutates nothing.
    #[test]
    fn reconcile_converges_and_is_idempotent(
        remote_texts in prop::collection::vec("[a-f]{1,2}", 0..10),
        desired_texts in prop::collection::btree_set("[a-f]{1,2}", 0..10),
    ) {
        let remote = Arc::new(MockRemote::new());
        let campaign = CampaignId::new(1);
        for text in &remote_texts {
            remote.seed(Callout::new(text.as_str()).into(), &[campaign]);
        }
        let reconciler = Reconciler::new(remote.clone());
        let scope = ReconcileScope::campaigns([campaign]);
        let desired: Vec<AdExtension> =
            desired_texts.iter().map(|t| Callout::new(t.as_str()).into()).collect();

        let outcome = tokio_test::block_on(
            reconciler.reconcile(ExtensionKind::Callout, desired.clone(), &scope),
        ).unwrap();
        prop_assert_eq!(texts(&outcome.extensions), desired_texts.clone());
        prop_assert_eq!(texts(&remote.extensions(ExtensionKind::Callout)), desired_texts.clone());
        prop_assert_eq!(remote.extensions(ExtensionKind::Callout).len(), desired_texts.len());

        remote.clear_calls();
        tokio_test::block_on(
            reconciler.reconcile(ExtensionKind::Callout, desired, &scope),
        ).unwrap();
        prop_assert!(remote.calls().iter().all(|c| !c.is_mutation()));
    }

    /// Sitelinks converge on descriptions too: a changed description is
    /// updated once and the next pass leaves everything alone.
    #[test]
    fn sitelink_reconcile_converges_and_is_idempotent(
        seeded in prop::collection::vec(("[a-d]", "[x-z]{1,2}", "[x-z]{1,2}"), 0..8),
        desired in prop::collection::btree_map("[a-d]", ("[x-z]{1,2}", "[x-z]{1,2}"), 0..5),
    ) {
        let kind = ExtensionKind::Sitelink;
        let remote = Arc::new(MockRemote::new());
        let campaign = CampaignId::new(1);
        for (text, d1, d2) in &seeded {
            remote.seed(sitelink(text, d1, d2), &[campaign]);
        }
        let reconciler = Reconciler::new(remote.clone());
        let scope = ReconcileScope::campaigns([campaign]);
        let wanted: Vec<AdExtension> =
            desired.iter().map(|(t, (d1, d2))| sitelink(t, d1, d2)).collect();
        let expected: SitelinkView = desired
            .iter()
            .map(|(t, (d1, d2))| (t.clone(), (Some(d1.clone()), Some(d2.clone()))))
            .collect();

        tokio_test::block_on(reconciler.reconcile(kind, wanted.clone(), &scope)).unwrap();
        prop_assert_eq!(sitelinks(&remote.extensions(kind)), expected.clone());
        prop_assert_eq!(remote.extensions(kind).len(), desired.len());

        remote.clear_calls();
        let again = tokio_test::block_on(reconciler.reconcile(kind, wanted, &scope)).unwrap();
        prop_assert!(remote.calls().iter().all(|c| !c.is_mutation()));
        prop_assert_eq!(again.kept, desired.len());
        prop_assert_eq!(sitelinks(&remote.extensions(kind)), expected);
    }

    /// A pass scoped to campaign 1 never takes anything away from campaign 2.
    #[test]
    fn scoped_pass_leaves_other_campaigns_intact(
        seeded in prop::collection::vec(("[a-d]", 0u8..3), 0..8),
        desired_texts in prop::collection::btree_set("[a-d]", 0..4),
    ) {
        let remote = Arc::new(MockRemote::new());
        let (c1, c2) = (CampaignId::new(1), CampaignId::new(2));
        let ids: Vec<_> = seeded
            .iter()
            .map(|(text, choice)| {
                let campaigns = attachment(*choice);
                (remote.seed(Callout::new(text.as_str()).into(), &campaigns), campaigns)
            })
            .collect();
        let reconciler = Reconciler::new(remote.clone());
        let desired: Vec<AdExtension> =
            desired_texts.iter().map(|t| Callout::new(t.as_str()).into()).collect();

        let outcome = tokio_test::block_on(
            reconciler.reconcile(ExtensionKind::Callout, desired, &ReconcileScope::campaigns([c1])),
        ).unwrap();

        let surviving: BTreeSet<_> = remote
            .extensions(ExtensionKind::Callout)
            .iter()
            .filter_map(AdExtension::id)
            .collect();
        for (id, campaigns) in &ids {
            if campaigns.contains(&c2) {
                prop_assert!(surviving.contains(id));
                prop_assert!(remote.associated_campaigns(*id).contains(&c2));
                prop_assert!(!outcome.deleted.contains(id));
            }
        }
        prop_assert_eq!(texts(&outcome.extensions), desired_texts);
    }

    /// Keys partition across the delete, create, keep and update sets.
    /// Redundant remote copies only repeat keys already planned.
    #[test]
    fn plan_partitions_both_sides(
        remote_texts in prop::collection::vec("[a-f]{1,2}", 0..10),
        desired_texts in prop::collection::btree_set("[a-f]{1,2}", 0..10),
    ) {
        let remote_exts: Vec<AdExtension> = remote_texts
            .iter()
            .enumerate()
            .map(|(i, t)| AdExtension::from(Callout::new(t.as_str())).with_id((i as i64 + 1).into()))
            .collect();
        let desired: Vec<AdExtension> =
            desired_texts.iter().map(|t| Callout::new(t.as_str()).into()).collect();
        let policy = KindPolicy::for_kind(ExtensionKind::Callout);

        let plan = ReconcilePlan::compute(&policy, desired, remote_exts);

        prop_assert_eq!(
            plan.to_delete.len() + plan.redundant.len() + plan.to_keep.len(),
            remote_texts.len()
        );
        prop_assert_eq!(plan.to_create.len() + plan.to_keep.len(), desired_texts.len());
        prop_assert!(plan.to_update.is_empty());

        let deleted = texts(&plan.to_delete);
        let created = texts(&plan.to_create);
        let kept = texts(&plan.to_keep);
        prop_assert_eq!(deleted.len(), plan.to_delete.len());
        prop_assert!(deleted.is_disjoint(&created));
        prop_assert!(deleted.is_disjoint(&kept));
        prop_assert!(created.is_disjoint(&kept));

        let planned: BTreeSet<String> = deleted.union(&kept).cloned().collect();
        prop_assert!(texts(&plan.redundant).is_subset(&planned));
        let distinct: BTreeSet<&String> = remote_texts.iter().collect();
        prop_assert_eq!(plan.redundant.len(), remote_texts.len() - distinct.len());
    }
}
