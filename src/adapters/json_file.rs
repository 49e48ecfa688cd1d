//! JSON file host store
//!
//! Entities live in one JSON document keyed by type then id:
//!
//! ```json
//! {
//!   "user": {
//!     "42": {
//!       "properties": { "mail": "jane@example.com" },
//!       "fields": { "field_phone": ["+44 20 7946 0000"] },
//!       "bound_to_parent": false
//!     }
//!   }
//! }
//! ```
//!
//! Commits rewrite the document through a sibling temporary file that is then
//! renamed over the original, so readers never see a half-written file.

use crate::adapters::store::{apply_write_set, EntityStore, FieldDataAdapter};
use crate::anonymization::models::ResolvedValue;
use crate::domain::context::ResultExt;
use crate::domain::{EntityId, EntitySnapshot, EntityTypeKey, EraserError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Stored form of one entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    properties: Map<String, Value>,

    #[serde(default)]
    fields: Map<String, Value>,

    #[serde(default)]
    bound_to_parent: bool,
}

type Document = BTreeMap<String, BTreeMap<String, StoredRecord>>;

/// Host store backed by a JSON document on disk
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open an existing store file
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Configuration`] if the file does not exist or is
    /// not a valid store document.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(EraserError::Configuration(format!(
                "Store file not found: {}",
                path.display()
            )));
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };

        // Fail early on a malformed document
        let document = store.read_document().await.map_err(|e| {
            EraserError::Configuration(format!("Invalid store file {}: {e}", store.path.display()))
        })?;
        tracing::debug!(
            path = %store.path.display(),
            entity_types = document.len(),
            "Opened JSON file store"
        );

        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read store file {}", self.path.display()))?;
        let document = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store file {}", self.path.display()))?;
        Ok(document)
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        let contents = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, contents)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    async fn record(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<StoredRecord> {
        let mut document = self.read_document().await?;
        document
            .get_mut(entity_type.as_str())
            .and_then(|entities| entities.remove(entity_id.as_str()))
            .ok_or_else(|| not_found(entity_type, entity_id))
    }
}

fn not_found(entity_type: &EntityTypeKey, entity_id: &EntityId) -> EraserError {
    EraserError::EntityNotFound {
        entity_type: entity_type.to_string(),
        entity_id: entity_id.to_string(),
    }
}

#[async_trait]
impl EntityStore for JsonFileStore {
    async fn load_entity(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<EntitySnapshot> {
        let record = self.record(entity_type, entity_id).await?;
        Ok(EntitySnapshot {
            entity_type: entity_type.clone(),
            entity_id: entity_id.clone(),
            properties: record.properties,
            fields: record.fields,
        })
    }

    async fn is_bound_to_parent(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<bool> {
        match self.record(entity_type, entity_id).await {
            Ok(record) => Ok(record.bound_to_parent),
            Err(EraserError::EntityNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl FieldDataAdapter for JsonFileStore {
    async fn commit_fields(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        values: &[ResolvedValue],
    ) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        let record = document
            .get_mut(entity_type.as_str())
            .and_then(|entities| entities.get_mut(entity_id.as_str()))
            .ok_or_else(|| not_found(entity_type, entity_id))?;

        apply_write_set(&mut record.properties, &mut record.fields, values)?;

        self.write_document(&document).await.map_err(|e| {
            EraserError::Persistence(format!(
                "Failed to commit {entity_type}/{entity_id}: {e}"
            ))
        })?;

        tracing::debug!(
            entity_type = %entity_type,
            entity_id = %entity_id,
            values = values.len(),
            path = %self.path.display(),
            "Committed values to JSON file store"
        );
        Ok(())
    }
}
