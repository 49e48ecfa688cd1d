//! Integration tests for the anonymization pipeline with synthetic entities

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use gdpr_eraser::adapters::InMemoryEntityStore;
use gdpr_eraser::anonymization::strategy::HashStrategy;
use gdpr_eraser::anonymization::{
    Anonymizer, EngineOptions, FieldAnonymizationSpec, FieldScope, PropertyAnonymizationSpec,
    PropertyRegistry, StrategyKind,
};
use gdpr_eraser::domain::{EntityId, EntitySnapshot, EntityTypeKey, EraserError};
use serde_json::{json, Value};
use std::sync::Arc;

fn user() -> EntityTypeKey {
    EntityTypeKey::new("user").unwrap()
}

/// Create a synthetic user entity with personal data
fn synthetic_user(id: u64, mail: &str) -> EntitySnapshot {
    let name: String = Name().fake();
    EntitySnapshot::builder()
        .entity_type("user")
        .unwrap()
        .entity_id(id.to_string())
        .unwrap()
        .property("mail", json!(mail))
        .property("name", json!(name))
        .property("created", json!("2019-07-21T10:15:00Z"))
        .field("field_phone", json!(["+44 20 7946 0000", "+44 20 7946 0001"]))
        .build()
        .unwrap()
}

fn engine_with(
    properties: Vec<PropertyAnonymizationSpec>,
    fields: Vec<FieldAnonymizationSpec>,
) -> (Anonymizer, Arc<InMemoryEntityStore>) {
    let mut registry = PropertyRegistry::new();
    registry.register_type(&user(), properties).unwrap();
    if !fields.is_empty() {
        registry.register_fields(&user(), fields).unwrap();
    }
    let store = Arc::new(InMemoryEntityStore::new());
    let engine = Anonymizer::new(registry, store.clone(), store.clone(), EngineOptions::default());
    (engine, store)
}

fn stored_property(store: &InMemoryEntityStore, id: u64, name: &str) -> Value {
    store
        .get(&user(), &EntityId::from(id))
        .unwrap()
        .property(name)
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn test_hash_mail_end_to_end() {
    let (engine, store) = engine_with(
        vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)],
        Vec::new(),
    );
    let original: String = SafeEmail().fake();
    store.insert(synthetic_user(42, &original));

    let outcome = engine.anonymize(&user(), &EntityId::from(42)).await.unwrap();

    assert_eq!(outcome.applied_spec_count, 1);
    assert_eq!(outcome.skipped_spec_count, 0);
    assert!(outcome.observer_failures.is_empty());

    let persisted = stored_property(&store, 42, "mail");
    assert_ne!(persisted, json!(original));
    assert_eq!(persisted, json!(HashStrategy::digest(&original)));
}

#[tokio::test]
async fn test_clear_and_generalize_are_idempotent() {
    let (engine, store) = engine_with(
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Generalize),
            PropertyAnonymizationSpec::new("name", StrategyKind::Clear),
            PropertyAnonymizationSpec::new("created", StrategyKind::Generalize),
        ],
        vec![FieldAnonymizationSpec::new(
            "field_phone",
            StrategyKind::Clear,
            FieldScope::Multivalue,
        )],
    );
    store.insert(synthetic_user(7, "jane@example.com"));

    engine.anonymize(&user(), &EntityId::from(7)).await.unwrap();
    let first = store.get(&user(), &EntityId::from(7)).unwrap();
    engine.anonymize(&user(), &EntityId::from(7)).await.unwrap();
    let second = store.get(&user(), &EntityId::from(7)).unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(first.property("mail"), Some(&json!("*@example.com")));
    assert_eq!(first.property("name"), Some(&json!("")));
    assert_eq!(first.property("created"), Some(&json!("2019")));
    assert_eq!(first.field("field_phone"), Some(&json!(["", ""])));
}

#[tokio::test]
async fn test_hash_and_randomize_change_on_rerun() {
    let (engine, store) = engine_with(
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
            PropertyAnonymizationSpec::new("name", StrategyKind::Randomize),
        ],
        Vec::new(),
    );
    store.insert(synthetic_user(8, "john@example.com"));

    engine.anonymize(&user(), &EntityId::from(8)).await.unwrap();
    let first_mail = stored_property(&store, 8, "mail");
    let first_name = stored_property(&store, 8, "name");

    engine.anonymize(&user(), &EntityId::from(8)).await.unwrap();
    assert_ne!(stored_property(&store, 8, "mail"), first_mail);
    assert_ne!(stored_property(&store, 8, "name"), first_name);
}

#[tokio::test]
async fn test_missing_values_are_skipped() {
    let (engine, store) = engine_with(
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
            PropertyAnonymizationSpec::new("signature", StrategyKind::Clear),
            PropertyAnonymizationSpec::new("name", StrategyKind::Skip),
        ],
        vec![FieldAnonymizationSpec::new(
            "field_address",
            StrategyKind::Clear,
            FieldScope::SingleValue,
        )],
    );
    let snapshot = synthetic_user(9, "skip@example.com");
    let original_name = snapshot.property("name").cloned().unwrap();
    store.insert(snapshot);

    let outcome = engine.anonymize(&user(), &EntityId::from(9)).await.unwrap();

    assert_eq!(outcome.applied_spec_count, 1);
    assert_eq!(outcome.skipped_spec_count, 3);
    assert_eq!(outcome.total_spec_count(), 4);
    assert_eq!(stored_property(&store, 9, "name"), original_name);
}

#[tokio::test]
async fn test_persistence_failure_leaves_entity_unchanged() {
    let (engine, store) = engine_with(
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
            PropertyAnonymizationSpec::new("name", StrategyKind::Clear),
        ],
        Vec::new(),
    );
    let snapshot = synthetic_user(10, "fail@example.com");
    store.insert(snapshot.clone());
    store.fail_commits_with(Some("disk full"));

    let result = engine.anonymize(&user(), &EntityId::from(10)).await;

    assert!(matches!(result, Err(EraserError::Persistence(ref m)) if m.contains("disk full")));
    assert_eq!(store.get(&user(), &EntityId::from(10)), Some(snapshot));
    assert_eq!(store.commit_count(), 0);

    // The failure is per request; a later request can succeed
    store.fail_commits_with(None);
    assert!(engine.anonymize(&user(), &EntityId::from(10)).await.is_ok());
    assert_eq!(store.commit_count(), 1);
}

#[tokio::test]
async fn test_strategy_error_names_target_and_writes_nothing() {
    let (engine, store) = engine_with(
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Clear),
            PropertyAnonymizationSpec::new("data", StrategyKind::Hash),
        ],
        Vec::new(),
    );
    let snapshot = EntitySnapshot::builder()
        .entity_type("user")
        .unwrap()
        .entity_id("11")
        .unwrap()
        .property("mail", json!("nested@example.com"))
        .property("data", json!({ "contact": { "phone": "555-0100" } }))
        .build()
        .unwrap();
    store.insert(snapshot.clone());

    let result = engine.anonymize(&user(), &EntityId::from(11)).await;

    assert!(matches!(result, Err(EraserError::Strategy(ref m)) if m.contains("data")));
    assert_eq!(store.get(&user(), &EntityId::from(11)), Some(snapshot));
}

#[tokio::test]
async fn test_bound_profile_is_rejected() {
    let (engine, store) = engine_with(
        vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)],
        Vec::new(),
    );
    let snapshot = synthetic_user(12, "bound@example.com");
    store.insert_bound(snapshot.clone());

    let result = engine.anonymize(&user(), &EntityId::from(12)).await;

    assert!(matches!(result, Err(EraserError::Configuration(_))));
    assert_eq!(store.get(&user(), &EntityId::from(12)), Some(snapshot));
}

#[tokio::test]
async fn test_unregistered_type_and_unknown_entity() {
    let (engine, _store) = engine_with(
        vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)],
        Vec::new(),
    );

    let node = EntityTypeKey::new("node").unwrap();
    assert!(matches!(
        engine.anonymize(&node, &EntityId::from(1)).await,
        Err(EraserError::Configuration(_))
    ));

    let result = engine.anonymize(&user(), &EntityId::from(404)).await;
    assert!(matches!(result, Err(EraserError::EntityNotFound { .. })));
    assert_eq!(result.unwrap_err().exit_code(), 7);
}

#[tokio::test]
async fn test_batch_reports_each_entity() {
    let (engine, store) = engine_with(
        vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Clear)],
        Vec::new(),
    );
    store.insert(synthetic_user(1, "a@example.com"));
    store.insert(synthetic_user(3, "c@example.com"));

    let ids = [EntityId::from(1), EntityId::from(2), EntityId::from(3)];
    let results = engine.anonymize_batch(&user(), &ids).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(EraserError::EntityNotFound { .. })));
    assert!(results[2].is_ok());
    assert_eq!(store.commit_count(), 2);
}
