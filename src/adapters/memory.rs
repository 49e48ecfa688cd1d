//! In-memory host store
//!
//! Keeps entities in a map guarded by a lock. Used by tests, dry runs and as
//! a reference implementation of the store traits.

use crate::adapters::store::{apply_write_set, EntityStore, FieldDataAdapter};
use crate::anonymization::models::ResolvedValue;
use crate::domain::{EntityId, EntitySnapshot, EntityTypeKey, EraserError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type EntityKey = (EntityTypeKey, EntityId);

#[derive(Debug, Clone)]
struct StoredEntity {
    snapshot: EntitySnapshot,
    bound_to_parent: bool,
}

/// Host store backed by a map
///
/// # Examples
///
/// ```
/// use gdpr_eraser::adapters::InMemoryEntityStore;
/// use gdpr_eraser::domain::EntitySnapshot;
/// use serde_json::json;
///
/// let store = InMemoryEntityStore::new();
/// store.insert(
///     EntitySnapshot::builder()
///         .entity_type("user").unwrap()
///         .entity_id("42").unwrap()
///         .property("mail", json!("jane@example.com"))
///         .build()
///         .unwrap(),
/// );
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: RwLock<HashMap<EntityKey, StoredEntity>>,
    commits: AtomicUsize,
    commit_failure: RwLock<Option<String>>,
    load_delay: Option<Duration>,
}

impl InMemoryEntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every load, to keep requests in flight in tests
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Insert or replace an entity
    pub fn insert(&self, snapshot: EntitySnapshot) {
        self.insert_entity(snapshot, false);
    }

    /// Insert an entity owned by a parent record
    pub fn insert_bound(&self, snapshot: EntitySnapshot) {
        self.insert_entity(snapshot, true);
    }

    fn insert_entity(&self, snapshot: EntitySnapshot, bound_to_parent: bool) {
        let key = (snapshot.entity_type.clone(), snapshot.entity_id.clone());
        self.entities.write().insert(
            key,
            StoredEntity {
                snapshot,
                bound_to_parent,
            },
        );
    }

    /// Current values of an entity
    pub fn get(&self, entity_type: &EntityTypeKey, entity_id: &EntityId) -> Option<EntitySnapshot> {
        self.entities
            .read()
            .get(&(entity_type.clone(), entity_id.clone()))
            .map(|stored| stored.snapshot.clone())
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    /// Whether the store holds no entity
    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Make every following commit fail with `message` (`None` to recover)
    pub fn fail_commits_with(&self, message: Option<&str>) {
        *self.commit_failure.write() = message.map(str::to_string);
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn load_entity(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<EntitySnapshot> {
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }

        self.get(entity_type, entity_id)
            .ok_or_else(|| EraserError::EntityNotFound {
                entity_type: entity_type.to_string(),
                entity_id: entity_id.to_string(),
            })
    }

    async fn is_bound_to_parent(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<bool> {
        Ok(self
            .entities
            .read()
            .get(&(entity_type.clone(), entity_id.clone()))
            .is_some_and(|stored| stored.bound_to_parent))
    }
}

#[async_trait]
impl FieldDataAdapter for InMemoryEntityStore {
    async fn commit_fields(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        values: &[ResolvedValue],
    ) -> Result<()> {
        if let Some(message) = self.commit_failure.read().clone() {
            return Err(EraserError::Persistence(message));
        }

        let mut entities = self.entities.write();
        let stored = entities
            .get_mut(&(entity_type.clone(), entity_id.clone()))
            .ok_or_else(|| EraserError::EntityNotFound {
                entity_type: entity_type.to_string(),
                entity_id: entity_id.to_string(),
            })?;

        // Apply to a copy so a rejected set leaves the entity untouched
        let mut snapshot = stored.snapshot.clone();
        apply_write_set(&mut snapshot.properties, &mut snapshot.fields, values)?;
        stored.snapshot = snapshot;

        self.commits.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            entity_type = %entity_type,
            entity_id = %entity_id,
            values = values.len(),
            "Committed values to in-memory store"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: &str) -> EntitySnapshot {
        EntitySnapshot::builder()
            .entity_type("user")
            .unwrap()
            .entity_id(id)
            .unwrap()
            .property("mail", json!("jane@example.com"))
            .build()
            .unwrap()
    }

    fn key() -> EntityTypeKey {
        EntityTypeKey::new("user").unwrap()
    }

    #[tokio::test]
    async fn test_load_and_commit() {
        let store = InMemoryEntityStore::new();
        store.insert(user("1"));

        let id = EntityId::from(1);
        let snapshot = store.load_entity(&key(), &id).await.unwrap();
        assert_eq!(snapshot.property("mail"), Some(&json!("jane@example.com")));

        store
            .commit_fields(&key(), &id, &[ResolvedValue::property("mail", json!(""))])
            .await
            .unwrap();
        assert_eq!(store.get(&key(), &id).unwrap().property("mail"), Some(&json!("")));
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_entity() {
        let store = InMemoryEntityStore::new();
        let result = store.load_entity(&key(), &EntityId::from(9)).await;
        assert!(matches!(result, Err(EraserError::EntityNotFound { .. })));
        assert!(!store.is_bound_to_parent(&key(), &EntityId::from(9)).await.unwrap());
    }

    #[tokio::test]
    async fn test_bound_entity() {
        let store = InMemoryEntityStore::new();
        store.insert_bound(user("2"));
        assert!(store.is_bound_to_parent(&key(), &EntityId::from(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_injected_commit_failure() {
        let store = InMemoryEntityStore::new();
        store.insert(user("1"));
        store.fail_commits_with(Some("disk full"));

        let id = EntityId::from(1);
        let result = store
            .commit_fields(&key(), &id, &[ResolvedValue::property("mail", json!(""))])
            .await;

        assert_eq!(result, Err(EraserError::Persistence("disk full".to_string())));
        assert_eq!(store.commit_count(), 0);
        assert_eq!(
            store.get(&key(), &id).unwrap().property("mail"),
            Some(&json!("jane@example.com"))
        );
    }
}
