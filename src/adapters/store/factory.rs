//! Store factory
//!
//! Creates the host store adapters selected in configuration.

use crate::adapters::json_file::JsonFileStore;
use crate::adapters::memory::InMemoryEntityStore;
use crate::adapters::store::traits::{EntityStore, FieldDataAdapter};
use crate::config::schema::{StoreConfig, StoreKind};
use crate::domain::Result;
use std::sync::Arc;

/// Reader and writer halves of a host store
pub type StorePair = (Arc<dyn EntityStore>, Arc<dyn FieldDataAdapter>);

/// Create the store adapters for the configured backend
///
/// Both halves share one underlying store.
///
/// # Errors
///
/// Returns an error if the backing file cannot be opened.
pub async fn create_store(config: &StoreConfig) -> Result<StorePair> {
    match config.kind {
        StoreKind::JsonFile => {
            tracing::info!(path = %config.path.display(), "Opening JSON file store");
            let store = Arc::new(JsonFileStore::open(&config.path).await?);
            Ok((store.clone() as Arc<dyn EntityStore>, store as Arc<dyn FieldDataAdapter>))
        }
        StoreKind::Memory => {
            tracing::info!("Creating in-memory store");
            let store = Arc::new(InMemoryEntityStore::new());
            Ok((store.clone() as Arc<dyn EntityStore>, store as Arc<dyn FieldDataAdapter>))
        }
    }
}
