//! Domain types for the eraser.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`EntityTypeKey`], [`EntityId`])
//! - **Entity snapshots** ([`EntitySnapshot`]) as read from the host store
//! - **Error types** ([`EraserError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use gdpr_eraser::domain::{EntityId, EntityTypeKey};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entity_type = EntityTypeKey::new("user")?;
//! let entity_id = EntityId::new("42")?;
//!
//! // This won't compile - the two identifiers are distinct types
//! // let wrong: EntityId = entity_type;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod entity;
pub mod errors;
pub mod ids;
pub mod result;

pub use entity::EntitySnapshot;
pub use errors::EraserError;
pub use ids::{EntityId, EntityTypeKey, FORBIDDEN_ENTITY_TYPE};
pub use result::Result;
