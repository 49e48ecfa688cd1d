//! External system integrations for the eraser.
//!
//! - [`store`] - traits the engine uses to read and write host entities
//! - [`memory`] - in-memory store for tests and dry runs
//! - [`json_file`] - store backed by a JSON document on disk
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the host system and
//! enable testing with in-memory implementations.
//!
//! ```rust,no_run
//! use gdpr_eraser::adapters::json_file::JsonFileStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileStore::open("data/entities.json").await?;
//! # Ok(())
//! # }
//! ```

pub mod json_file;
pub mod memory;
pub mod store;

pub use json_file::JsonFileStore;
pub use memory::InMemoryEntityStore;
pub use store::{create_store, EntityStore, FieldDataAdapter};
