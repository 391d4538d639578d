//! Dynamic property domain entity
//!
//! A dynamic property is a user-defined attribute attached to every instance
//! of a named object type (e.g. a "Color" on "Product").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dictionary_item::DictionaryItemId;

/// Unique identifier for a dynamic property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicPropertyId(pub Uuid);

impl DynamicPropertyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DynamicPropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DynamicPropertyId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DynamicPropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of value a dynamic property holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicPropertyValueType {
    ShortText,
    LongText,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    /// Values are references to the property's dictionary items
    Dictionary,
}

impl DynamicPropertyValueType {
    pub fn is_dictionary(&self) -> bool {
        matches!(self, DynamicPropertyValueType::Dictionary)
    }

    /// Check that a scalar JSON value fits this value type
    ///
    /// Dictionary properties never accept scalars; their values reference
    /// dictionary items instead.
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            DynamicPropertyValueType::ShortText | DynamicPropertyValueType::LongText => {
                value.is_string()
            }
            DynamicPropertyValueType::Integer => value.is_i64() || value.is_u64(),
            DynamicPropertyValueType::Decimal => value.is_number(),
            DynamicPropertyValueType::Boolean => value.is_boolean(),
            DynamicPropertyValueType::DateTime => value
                .as_str()
                .map(|s| DateTime::parse_from_rfc3339(s).is_ok())
                .unwrap_or(false),
            DynamicPropertyValueType::Dictionary => false,
        }
    }
}

impl std::fmt::Display for DynamicPropertyValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DynamicPropertyValueType::ShortText => "short_text",
            DynamicPropertyValueType::LongText => "long_text",
            DynamicPropertyValueType::Integer => "integer",
            DynamicPropertyValueType::Decimal => "decimal",
            DynamicPropertyValueType::Boolean => "boolean",
            DynamicPropertyValueType::DateTime => "date_time",
            DynamicPropertyValueType::Dictionary => "dictionary",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for DynamicPropertyValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "").as_str() {
            "shorttext" => Ok(DynamicPropertyValueType::ShortText),
            "longtext" => Ok(DynamicPropertyValueType::LongText),
            "integer" => Ok(DynamicPropertyValueType::Integer),
            "decimal" => Ok(DynamicPropertyValueType::Decimal),
            "boolean" => Ok(DynamicPropertyValueType::Boolean),
            "datetime" => Ok(DynamicPropertyValueType::DateTime),
            "dictionary" => Ok(DynamicPropertyValueType::Dictionary),
            _ => Err(format!("Unknown value type: {}", s)),
        }
    }
}

/// A display name for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    pub locale: String,
    pub name: String,
}

/// A dynamic property definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicProperty {
    pub id: DynamicPropertyId,
    /// Name of the object type this property is attached to
    pub object_type: String,
    pub name: String,
    pub description: Option<String>,
    pub value_type: DynamicPropertyValueType,
    pub is_array: bool,
    pub is_required: bool,
    pub display_order: Option<i32>,
    pub display_names: Vec<LocalizedName>,
    /// Allowed values, ordered by item sort order. Filled on load, ignored on save.
    pub dictionary_item_ids: Vec<DictionaryItemId>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl DynamicProperty {
    /// Display name for a locale, falling back to the property name
    pub fn display_name(&self, locale: &str) -> &str {
        self.display_names
            .iter()
            .find(|n| n.locale.eq_ignore_ascii_case(locale))
            .map(|n| n.name.as_str())
            .unwrap_or(&self.name)
    }
}

/// A value of a dynamic property on one object instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicPropertyObjectValue {
    pub object_type: String,
    pub object_id: String,
    pub property_id: DynamicPropertyId,
    pub locale: Option<String>,
    /// Scalar value for non-dictionary properties
    pub value: Option<serde_json::Value>,
    /// Selected item for dictionary properties
    pub dictionary_item_id: Option<DictionaryItemId>,
}
