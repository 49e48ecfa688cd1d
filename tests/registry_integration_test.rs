//! Integration tests for the property registry

use gdpr_eraser::anonymization::{
    FieldAnonymizationSpec, FieldScope, PropertyAnonymizationSpec, PropertyRegistry, StrategyKind,
};
use gdpr_eraser::domain::{EntityTypeKey, EraserError, FORBIDDEN_ENTITY_TYPE};
use test_case::test_case;

fn key(name: &str) -> EntityTypeKey {
    EntityTypeKey::new(name).unwrap()
}

#[test_case("user"; "user")]
#[test_case("commerce_order"; "order")]
#[test_case("node"; "node")]
#[test_case("commerce_customer_profile_archive"; "similar name")]
fn test_register_then_get_keeps_order(entity_type: &str) {
    let specs = vec![
        PropertyAnonymizationSpec::new("name", StrategyKind::Randomize),
        PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
        PropertyAnonymizationSpec::new("init", StrategyKind::Clear),
        PropertyAnonymizationSpec::new("created", StrategyKind::Generalize),
    ];

    let mut registry = PropertyRegistry::new();
    registry.register_type(&key(entity_type), specs.clone()).unwrap();

    assert_eq!(registry.specs(&key(entity_type)), specs.as_slice());
}

#[test_case(Vec::new(); "no specs")]
#[test_case(vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)]; "one spec")]
#[test_case(vec![
    PropertyAnonymizationSpec::new("address", StrategyKind::Clear),
    PropertyAnonymizationSpec::new("phone", StrategyKind::Skip),
]; "several specs")]
fn test_forbidden_type_always_rejected(specs: Vec<PropertyAnonymizationSpec>) {
    let mut registry = PropertyRegistry::new();
    registry
        .register_type(
            &key("user"),
            vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)],
        )
        .unwrap();
    let before = registry.clone();

    let result = registry.register_type(&key(FORBIDDEN_ENTITY_TYPE), specs);

    assert!(matches!(result, Err(EraserError::Configuration(_))));
    assert_eq!(registry, before);
}

#[test]
fn test_forbidden_fields_rejected() {
    let mut registry = PropertyRegistry::new();
    let result = registry.register_fields(
        &key(FORBIDDEN_ENTITY_TYPE),
        vec![FieldAnonymizationSpec::new(
            "address",
            StrategyKind::Clear,
            FieldScope::SingleValue,
        )],
    );
    assert!(matches!(result, Err(EraserError::Configuration(_))));
    assert!(registry.is_empty());
}

#[test]
fn test_duplicate_property_rejected() {
    let mut registry = PropertyRegistry::new();
    let result = registry.register_type(
        &key("user"),
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
            PropertyAnonymizationSpec::new("mail", StrategyKind::Clear),
        ],
    );
    assert!(matches!(result, Err(EraserError::Configuration(_))));
    assert!(registry.specs(&key("user")).is_empty());
}

#[test]
fn test_unregistered_type_has_no_specs() {
    let registry = PropertyRegistry::new();
    assert!(registry.specs(&key("user")).is_empty());
    assert!(registry.field_specs(&key("user")).is_empty());
    assert!(registry.type_specs(&key("user")).is_none());
}
