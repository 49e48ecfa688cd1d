//! Domain identifier types with validation
//!
//! Newtype wrappers for entity type keys and entity ids, so the two can never
//! be swapped at a call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity type that can never be registered as anonymizable.
///
/// A customer profile bound to an order cannot be saved on its own, so it is
/// excluded from the registry entirely.
pub const FORBIDDEN_ENTITY_TYPE: &str = "commerce_customer_profile";

/// Entity type key newtype wrapper
///
/// Opaque identifier for an entity type, used only as a mapping key.
///
/// # Examples
///
/// ```
/// use gdpr_eraser::domain::ids::EntityTypeKey;
/// use std::str::FromStr;
///
/// let key = EntityTypeKey::from_str("user").unwrap();
/// assert_eq!(key.as_str(), "user");
/// assert!(!key.is_forbidden());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityTypeKey(String);

impl EntityTypeKey {
    /// Creates a new EntityTypeKey, rejecting blank strings
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Entity type key cannot be empty".to_string());
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the order-bound customer profile type
    pub fn is_forbidden(&self) -> bool {
        self.0 == FORBIDDEN_ENTITY_TYPE
    }
}

impl fmt::Display for EntityTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityTypeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityTypeKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityTypeKey> for String {
    fn from(key: EntityTypeKey) -> Self {
        key.0
    }
}

impl AsRef<str> for EntityTypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Entity identifier newtype wrapper
///
/// Numeric host ids are carried in their decimal string form.
///
/// # Examples
///
/// ```
/// use gdpr_eraser::domain::ids::EntityId;
///
/// let id = EntityId::from(42u64);
/// assert_eq!(id.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Creates a new EntityId, rejecting blank strings
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Entity ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
