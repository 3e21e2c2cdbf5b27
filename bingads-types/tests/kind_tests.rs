use bingads_types::{AssociationType, Environment, Error, ExtensionKind, Status};

// ── ExtensionKind ─────────────────────────────────────────────────

#[test]
fn type_names_match_service() {
    assert_eq!(ExtensionKind::Sitelink.type_name(), "Sitelink2AdExtension");
    assert_eq!(ExtensionKind::Callout.type_name(), "CalloutAdExtension");
    assert_eq!(ExtensionKind::Review.type_name(), "ReviewAdExtension");
}

#[test]
fn from_type_name_roundtrip() {
    for kind in ExtensionKind::ALL {
        assert_eq!(ExtensionKind::from_type_name(kind.type_name()), Some(kind));
    }
    assert_eq!(ExtensionKind::from_type_name("ImageAdExtension"), None);
}

#[test]
fn kind_parses_singular_plural_and_type_name() {
    assert_eq!("callout".parse::<ExtensionKind>().unwrap(), ExtensionKind::Callout);
    assert_eq!("Sitelinks".parse::<ExtensionKind>().unwrap(), ExtensionKind::Sitelink);
    assert_eq!(
        "ReviewAdExtension".parse::<ExtensionKind>().unwrap(),
        ExtensionKind::Review
    );
    assert!("snippet".parse::<ExtensionKind>().is_err());
}

#[test]
fn kind_serde_is_snake_case() {
    let json = serde_json::to_string(&ExtensionKind::Sitelink).unwrap();
    assert_eq!(json, "\"sitelink\"");
}

// ── Status ────────────────────────────────────────────────────────

#[test]
fn status_opposite() {
    assert_eq!(Status::Active.opposite(), Status::Paused);
    assert_eq!(Status::Paused.opposite(), Status::Active);
}

#[test]
fn status_parse_and_display() {
    assert_eq!("Paused".parse::<Status>().unwrap(), Status::Paused);
    assert_eq!("active".parse::<Status>().unwrap(), Status::Active);
    assert_eq!(Status::Active.to_string(), "Active");
    assert!("Deleted".parse::<Status>().is_err());
}

#[test]
fn unknown_values_name_the_field() {
    let err = "Deleted".parse::<Status>().unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "status", .. }));
    let err = "banner".parse::<ExtensionKind>().unwrap_err();
    assert_eq!(err.to_string(), "invalid extension kind: `banner`");
}

#[test]
fn status_serializes_with_service_casing() {
    assert_eq!(serde_json::to_string(&Status::Paused).unwrap(), "\"Paused\"");
}

// ── AssociationType / Environment ─────────────────────────────────

#[test]
fn association_type_display() {
    assert_eq!(AssociationType::Campaign.to_string(), "Campaign");
    assert_eq!(AssociationType::AdGroup.as_str(), "AdGroup");
}

#[test]
fn environment_defaults_to_production() {
    assert_eq!(Environment::default(), Environment::Production);
    assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
    assert!("staging".parse::<Environment>().is_err());
}
