use bingads_model::{KindPolicy, UpdateMode};
use bingads_types::{AssociationType, ExtensionKind};

#[test]
fn sitelinks_update_in_place_across_whole_library() {
    let p = KindPolicy::for_kind(ExtensionKind::Sitelink);
    assert_eq!(p.max_count, 10);
    assert_eq!(p.update_mode, UpdateMode::UpdateOnChange);
    assert_eq!(p.fetch_filter, None);
}

#[test]
fn callouts_and_reviews_keep_on_match() {
    for kind in [ExtensionKind::Callout, ExtensionKind::Review] {
        let p = KindPolicy::for_kind(kind);
        assert_eq!(p.kind, kind);
        assert_eq!(p.max_count, 20);
        assert_eq!(p.update_mode, UpdateMode::KeepOnMatch);
        assert_eq!(p.fetch_filter, Some(AssociationType::Campaign));
    }
}

#[test]
fn overrides_apply() {
    let p = KindPolicy::for_kind(ExtensionKind::Callout)
        .with_max_count(3)
        .with_fetch_filter(None);
    assert_eq!(p.max_count, 3);
    assert_eq!(p.fetch_filter, None);
}
