//! Search criteria and results
//!
//! Criteria are the public query shape (and the cache fingerprint). They are
//! validated and resolved into typed queries before any store or cache is touched.

use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::dynamic_property::DynamicPropertyId;
use crate::error::DomainError;

const DEFAULT_TAKE: i64 = 20;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// One `column[:direction]` element of a sort expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortInfo {
    pub sort_column: String,
    pub sort_direction: SortDirection,
}

impl SortInfo {
    /// Parse a sort expression such as `"name:desc;objectType"`
    pub fn parse_list(sort: &str) -> Result<Vec<SortInfo>, DomainError> {
        sort.split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| -> Result<SortInfo, DomainError> {
                let (column, direction) = match part.split_once(':') {
                    Some((c, d)) => (c.trim(), d),
                    None => (part, ""),
                };
                let sort_direction = direction.parse().map_err(DomainError::Validation)?;
                Ok(SortInfo {
                    sort_column: column.to_string(),
                    sort_direction,
                })
            })
            .collect()
    }
}

/// A resolved ordering over a known column set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy<C> {
    pub column: C,
    pub direction: SortDirection,
}

/// Resolve a sort expression into typed orderings, defaulting when empty
fn resolve_order<C>(sort: Option<&str>, default: C) -> Result<Vec<OrderBy<C>>, DomainError>
where
    C: FromStr<Err = String>,
{
    let infos = match sort {
        Some(s) => SortInfo::parse_list(s)?,
        None => Vec::new(),
    };

    if infos.is_empty() {
        return Ok(vec![OrderBy {
            column: default,
            direction: SortDirection::Ascending,
        }]);
    }

    infos
        .into_iter()
        .map(|info| -> Result<OrderBy<C>, DomainError> {
            Ok(OrderBy {
                column: info.sort_column.parse().map_err(DomainError::Validation)?,
                direction: info.sort_direction,
            })
        })
        .collect()
}

fn non_negative(name: &str, value: i64) -> Result<u64, DomainError> {
    u64::try_from(value)
        .map_err(|_| DomainError::Validation(format!("{} must be >= 0, got {}", name, value)))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn normalize_column(s: &str) -> String {
    s.trim().to_lowercase().replace('_', "")
}

/// Sortable columns of dynamic properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertySortColumn {
    Name,
    ObjectType,
    ValueType,
    DisplayOrder,
    CreatedAt,
    ModifiedAt,
}

impl FromStr for PropertySortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_column(s).as_str() {
            "name" => Ok(PropertySortColumn::Name),
            "objecttype" => Ok(PropertySortColumn::ObjectType),
            "valuetype" => Ok(PropertySortColumn::ValueType),
            "displayorder" => Ok(PropertySortColumn::DisplayOrder),
            "createdat" | "createddate" => Ok(PropertySortColumn::CreatedAt),
            "modifiedat" | "modifieddate" => Ok(PropertySortColumn::ModifiedAt),
            _ => Err(format!("Unknown sort column for dynamic properties: {}", s)),
        }
    }
}

/// Sortable columns of dictionary items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryItemSortColumn {
    Name,
    SortOrder,
}

impl FromStr for DictionaryItemSortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_column(s).as_str() {
            "name" => Ok(DictionaryItemSortColumn::Name),
            "sortorder" => Ok(DictionaryItemSortColumn::SortOrder),
            _ => Err(format!("Unknown sort column for dictionary items: {}", s)),
        }
    }
}

/// Search criteria for dynamic properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicPropertySearchCriteria {
    /// Exact object type filter
    pub object_type: Option<String>,
    /// Object type membership filter
    pub object_types: Vec<String>,
    /// Substring match on name
    pub keyword: Option<String>,
    /// Sort expression, e.g. `"name:desc;objectType"`
    pub sort: Option<String>,
    pub skip: i64,
    pub take: i64,
}

impl Default for DynamicPropertySearchCriteria {
    fn default() -> Self {
        Self {
            object_type: None,
            object_types: Vec::new(),
            keyword: None,
            sort: None,
            skip: 0,
            take: DEFAULT_TAKE,
        }
    }
}

impl DynamicPropertySearchCriteria {
    /// Validate and resolve into a store query
    pub fn to_query(&self) -> Result<PropertyQuery, DomainError> {
        Ok(PropertyQuery {
            object_type: non_empty(&self.object_type),
            object_types: self.object_types.clone(),
            keyword: non_empty(&self.keyword),
            order: resolve_order(self.sort.as_deref(), PropertySortColumn::Name)?,
            skip: non_negative("skip", self.skip)?,
            take: non_negative("take", self.take)?,
        })
    }
}

/// Search criteria for dictionary items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryItemSearchCriteria {
    pub property_id: Option<DynamicPropertyId>,
    pub keyword: Option<String>,
    pub sort: Option<String>,
    pub skip: i64,
    pub take: i64,
}

impl Default for DictionaryItemSearchCriteria {
    fn default() -> Self {
        Self {
            property_id: None,
            keyword: None,
            sort: None,
            skip: 0,
            take: DEFAULT_TAKE,
        }
    }
}

impl DictionaryItemSearchCriteria {
    /// Validate and resolve into a store query
    pub fn to_query(&self) -> Result<DictionaryItemQuery, DomainError> {
        Ok(DictionaryItemQuery {
            property_id: self.property_id,
            keyword: non_empty(&self.keyword),
            order: resolve_order(self.sort.as_deref(), DictionaryItemSortColumn::Name)?,
            skip: non_negative("skip", self.skip)?,
            take: non_negative("take", self.take)?,
        })
    }
}

/// Validated dynamic property query. Filters are AND-ed.
///
/// Stores append `id ASC` after `order` so equal sort keys page deterministically.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub object_type: Option<String>,
    pub object_types: Vec<String>,
    pub keyword: Option<String>,
    pub order: Vec<OrderBy<PropertySortColumn>>,
    pub skip: u64,
    pub take: u64,
}

/// Validated dictionary item query. Same tie-break rule as [`PropertyQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryItemQuery {
    pub property_id: Option<DynamicPropertyId>,
    pub keyword: Option<String>,
    pub order: Vec<OrderBy<DictionaryItemSortColumn>>,
    pub skip: u64,
    pub take: u64,
}

/// One page of matching ids plus the unpaginated match count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPage<I> {
    pub total_count: u64,
    pub ids: Vec<I>,
}

/// A page of search results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<T> {
    /// Matches ignoring skip/take
    pub total_count: u64,
    pub results: Vec<T>,
}

/// Arrange loaded items in the order of `ids`
///
/// Items whose id is not in `ids` are dropped; ids with no loaded item
/// (deleted in between) leave no gap.
pub fn reorder_by_ids<T, I, F>(items: Vec<T>, ids: &[I], key: F) -> Vec<T>
where
    I: Eq + Hash,
    F: Fn(&T) -> &I,
{
    let positions: HashMap<&I, usize> = ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(ids.len()).collect();

    for item in items {
        let pos = positions.get(key(&item)).copied();
        if let Some(pos) = pos {
            slots[pos] = Some(item);
        }
    }

    slots.into_iter().flatten().collect()
}
