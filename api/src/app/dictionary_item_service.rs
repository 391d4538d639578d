//! Dictionary item service
//!
//! Items are the allowed values of dictionary-typed dynamic properties.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cache::CacheRegion;
use crate::domain::entities::{DictionaryItem, DictionaryItemId, DynamicPropertyId};
use crate::domain::ports::{DictionaryItemRepository, DynamicPropertyRepository};
use crate::error::DomainError;

/// Service for dictionary items
pub struct DictionaryItemService<DR, PR>
where
    DR: DictionaryItemRepository,
    PR: DynamicPropertyRepository,
{
    items: Arc<DR>,
    properties: Arc<PR>,
    region: Arc<CacheRegion>,
}

impl<DR, PR> DictionaryItemService<DR, PR>
where
    DR: DictionaryItemRepository,
    PR: DynamicPropertyRepository,
{
    pub fn new(items: Arc<DR>, properties: Arc<PR>, region: Arc<CacheRegion>) -> Self {
        Self {
            items,
            properties,
            region,
        }
    }

    /// Batch get. Order is unspecified and unknown ids are skipped.
    pub async fn get_dictionary_items(
        &self,
        ids: &[DictionaryItemId],
    ) -> Result<Vec<DictionaryItem>, DomainError> {
        self.items.find_by_ids(ids).await
    }

    /// Insert new items and update existing ones
    pub async fn save_dictionary_items(
        &self,
        items: &[DictionaryItem],
    ) -> Result<Vec<DictionaryItem>, DomainError> {
        self.validate(items).await?;

        let result = self.items.save(items).await;
        self.region.expire();

        let saved = result?;
        tracing::info!("Saved {} dictionary items", saved.len());
        Ok(saved)
    }

    pub async fn delete_dictionary_items(
        &self,
        ids: &[DictionaryItemId],
    ) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = self.items.delete(ids).await;
        self.region.expire();

        let removed = result?;
        tracing::info!("Deleted {} dictionary items", removed);
        Ok(removed)
    }

    async fn validate(&self, items: &[DictionaryItem]) -> Result<(), DomainError> {
        if let Some(item) = items.iter().find(|i| i.name.trim().is_empty()) {
            return Err(DomainError::Validation(format!(
                "Dictionary item {} has an empty name",
                item.id
            )));
        }

        let owner_ids: Vec<DynamicPropertyId> = items
            .iter()
            .map(|i| i.property_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let owners: HashMap<_, _> = self
            .properties
            .find_by_ids(&owner_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        for owner_id in &owner_ids {
            let owner = owners.get(owner_id).ok_or_else(|| {
                DomainError::Validation(format!("Dynamic property {} does not exist", owner_id))
            })?;
            if !owner.value_type.is_dictionary() {
                return Err(DomainError::Validation(format!(
                    "Dynamic property {} is a {} property and has no dictionary",
                    owner.name, owner.value_type
                )));
            }
        }

        // Names are unique per property, counting stored items not being replaced
        let saving: HashSet<DictionaryItemId> = items.iter().map(|i| i.id).collect();
        let mut taken: HashSet<(DynamicPropertyId, String)> = HashSet::new();
        for owner_id in &owner_ids {
            for stored in self.items.find_by_property(owner_id).await? {
                if !saving.contains(&stored.id) {
                    taken.insert((stored.property_id, stored.name));
                }
            }
        }

        for item in items {
            if !taken.insert((item.property_id, item.name.clone())) {
                return Err(DomainError::AlreadyExists(format!(
                    "Dictionary item {} already exists for property {}",
                    item.name, item.property_id
                )));
            }
        }

        Ok(())
    }
}
