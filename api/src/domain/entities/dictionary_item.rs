//! Dictionary item domain entity
//!
//! One allowed value of a dictionary-typed dynamic property.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dynamic_property::{DynamicPropertyId, LocalizedName};

/// Unique identifier for a dictionary item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictionaryItemId(pub Uuid);

impl DictionaryItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DictionaryItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DictionaryItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DictionaryItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An enumerated value of a dictionary property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub id: DictionaryItemId,
    pub property_id: DynamicPropertyId,
    /// Value label
    pub name: String,
    pub sort_order: Option<i32>,
    pub display_names: Vec<LocalizedName>,
}

impl DictionaryItem {
    /// Ordering used for a property's item list: sort order (unset last), then name, then id
    pub fn list_order(a: &DictionaryItem, b: &DictionaryItem) -> std::cmp::Ordering {
        let key = |i: &DictionaryItem| (i.sort_order.is_none(), i.sort_order);
        key(a)
            .cmp(&key(b))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    }
}
