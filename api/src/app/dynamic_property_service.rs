//! Dynamic property service
//!
//! CRUD for property definitions and per-object values. Object types must be
//! registered before properties can be defined on them. Every write expires
//! the dynamic properties cache region.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::CacheRegion;
use crate::domain::entities::{DynamicProperty, DynamicPropertyId, DynamicPropertyObjectValue};
use crate::domain::ports::{DictionaryItemRepository, DynamicPropertyRepository};
use crate::error::DomainError;

/// Service for dynamic property definitions and their values
pub struct DynamicPropertyService<PR, DR>
where
    PR: DynamicPropertyRepository,
    DR: DictionaryItemRepository,
{
    properties: Arc<PR>,
    dictionary_items: Arc<DR>,
    region: Arc<CacheRegion>,
    object_types: RwLock<BTreeSet<String>>,
}

impl<PR, DR> DynamicPropertyService<PR, DR>
where
    PR: DynamicPropertyRepository,
    DR: DictionaryItemRepository,
{
    pub fn new(properties: Arc<PR>, dictionary_items: Arc<DR>, region: Arc<CacheRegion>) -> Self {
        Self {
            properties,
            dictionary_items,
            region,
            object_types: RwLock::new(BTreeSet::new()),
        }
    }

    /// Allow properties on `object_type`. Returns false if it was already registered.
    pub fn register_type(&self, object_type: &str) -> bool {
        let object_type = object_type.trim();
        if object_type.is_empty() {
            return false;
        }

        let added = self
            .object_types
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(object_type.to_string());
        if added {
            tracing::info!("Registered dynamic property object type {}", object_type);
        }
        added
    }

    /// Registered object types in sorted order
    pub fn registered_types(&self) -> Vec<String> {
        self.object_types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn is_registered(&self, object_type: &str) -> bool {
        self.object_types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(object_type)
    }

    /// Batch get. Order is unspecified and unknown ids are skipped.
    pub async fn get_dynamic_properties(
        &self,
        ids: &[DynamicPropertyId],
    ) -> Result<Vec<DynamicProperty>, DomainError> {
        self.properties.find_by_ids(ids).await
    }

    /// Insert new properties and update existing ones
    pub async fn save_dynamic_properties(
        &self,
        properties: &[DynamicProperty],
    ) -> Result<Vec<DynamicProperty>, DomainError> {
        self.validate(properties).await?;

        let result = self.properties.save(properties).await;
        self.region.expire();

        let saved = result?;
        tracing::info!("Saved {} dynamic properties", saved.len());
        Ok(saved)
    }

    /// Delete properties and their dictionary items
    ///
    /// Values stored against the properties stay behind.
    pub async fn delete_dynamic_properties(
        &self,
        ids: &[DynamicPropertyId],
    ) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = self.properties.delete(ids).await;
        self.region.expire();

        let removed = result?;
        tracing::info!("Deleted {} dynamic properties", removed);
        Ok(removed)
    }

    async fn validate(&self, properties: &[DynamicProperty]) -> Result<(), DomainError> {
        let mut batch: HashSet<(&str, &str)> = HashSet::new();

        let ids: Vec<DynamicPropertyId> = properties.iter().map(|p| p.id).collect();
        let stored: HashMap<DynamicPropertyId, DynamicProperty> = self
            .properties
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        for property in properties {
            if property.name.trim().is_empty() {
                return Err(DomainError::Validation(
                    "Dynamic property name must not be empty".to_string(),
                ));
            }
            if property.object_type.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "Dynamic property {} has no object type",
                    property.name
                )));
            }
            if !self.is_registered(&property.object_type) {
                return Err(DomainError::Validation(format!(
                    "Object type {} is not registered for dynamic properties",
                    property.object_type
                )));
            }
            if !batch.insert((property.object_type.as_str(), property.name.as_str())) {
                return Err(DomainError::AlreadyExists(format!(
                    "Dynamic property {} is defined twice for {}",
                    property.name, property.object_type
                )));
            }

            // Items would be left behind on a non-dictionary property
            if let Some(previous) = stored.get(&property.id) {
                if previous.value_type.is_dictionary()
                    && !property.value_type.is_dictionary()
                    && !previous.dictionary_item_ids.is_empty()
                {
                    return Err(DomainError::Validation(format!(
                        "Dynamic property {} still has {} dictionary items and must stay a dictionary",
                        previous.name,
                        previous.dictionary_item_ids.len()
                    )));
                }
            }

            if let Some(existing) = self
                .properties
                .find_by_name(&property.object_type, &property.name)
                .await?
            {
                if existing.id != property.id {
                    return Err(DomainError::AlreadyExists(format!(
                        "Dynamic property {} already exists for {}",
                        property.name, property.object_type
                    )));
                }
            }
        }

        Ok(())
    }

    /// All values stored for one object
    pub async fn get_object_values(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<Vec<DynamicPropertyObjectValue>, DomainError> {
        self.properties
            .find_object_values(object_type, object_id)
            .await
    }

    /// Replace every value stored for one object
    ///
    /// Scalar values must fit the property value type; dictionary properties
    /// take references to their own items.
    pub async fn save_object_values(
        &self,
        object_type: &str,
        object_id: &str,
        values: &[DynamicPropertyObjectValue],
    ) -> Result<(), DomainError> {
        if object_id.trim().is_empty() {
            return Err(DomainError::Validation("Object id must not be empty".to_string()));
        }

        let property_ids: Vec<DynamicPropertyId> = values
            .iter()
            .map(|v| v.property_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let properties: HashMap<DynamicPropertyId, DynamicProperty> = self
            .properties
            .find_by_ids(&property_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let item_ids: Vec<_> = values.iter().filter_map(|v| v.dictionary_item_id).collect();
        let items: HashMap<_, _> = self
            .dictionary_items
            .find_by_ids(&item_ids)
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        let mut per_locale: HashMap<(DynamicPropertyId, Option<&str>), usize> = HashMap::new();

        for value in values {
            if value.object_type != object_type || value.object_id != object_id {
                return Err(DomainError::Validation(format!(
                    "Value for property {} belongs to another object",
                    value.property_id
                )));
            }

            let property = properties.get(&value.property_id).ok_or_else(|| {
                DomainError::Validation(format!(
                    "Dynamic property {} does not exist",
                    value.property_id
                ))
            })?;
            if property.object_type != object_type {
                return Err(DomainError::Validation(format!(
                    "Dynamic property {} is defined for {}, not {}",
                    property.name, property.object_type, object_type
                )));
            }

            if property.value_type.is_dictionary() {
                let item = value
                    .dictionary_item_id
                    .and_then(|id| items.get(&id))
                    .filter(|item| item.property_id == property.id);
                if item.is_none() {
                    return Err(DomainError::Validation(format!(
                        "Value of {} must reference one of its dictionary items",
                        property.name
                    )));
                }
            } else {
                let accepted = value
                    .value
                    .as_ref()
                    .map(|v| property.value_type.accepts(v))
                    .unwrap_or(false);
                if !accepted {
                    return Err(DomainError::Validation(format!(
                        "Value of {} must be a {}",
                        property.name, property.value_type
                    )));
                }
            }

            let count = per_locale
                .entry((property.id, value.locale.as_deref()))
                .or_default();
            *count += 1;
            if *count > 1 && !property.is_array {
                return Err(DomainError::Validation(format!(
                    "Dynamic property {} accepts a single value per locale",
                    property.name
                )));
            }
        }

        let result = self
            .properties
            .replace_object_values(object_type, object_id, values)
            .await;
        self.region.expire();

        result?;
        tracing::debug!(
            "Stored {} values for {} {}",
            values.len(),
            object_type,
            object_id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::region::DYNAMIC_PROPERTIES_REGION;
    use crate::domain::entities::{DictionaryItemId, DynamicPropertyValueType};
    use crate::test_utils::{
        test_dictionary_item, test_dictionary_property, test_property,
        InMemoryDynamicPropertyStore,
    };
    use serde_json::json;

    type TestService =
        DynamicPropertyService<InMemoryDynamicPropertyStore, InMemoryDynamicPropertyStore>;

    fn create_service(
        store: InMemoryDynamicPropertyStore,
    ) -> (TestService, Arc<InMemoryDynamicPropertyStore>, Arc<CacheRegion>) {
        let store = Arc::new(store);
        let region = Arc::new(CacheRegion::new(DYNAMIC_PROPERTIES_REGION));
        let service = DynamicPropertyService::new(store.clone(), store.clone(), region.clone());
        service.register_type("Product");
        (service, store, region)
    }

    fn value(property: &DynamicProperty, v: serde_json::Value) -> DynamicPropertyObjectValue {
        DynamicPropertyObjectValue {
            object_type: property.object_type.clone(),
            object_id: "p-1".to_string(),
            property_id: property.id,
            locale: None,
            value: Some(v),
            dictionary_item_id: None,
        }
    }

    fn item_value(
        property: &DynamicProperty,
        item: DictionaryItemId,
    ) -> DynamicPropertyObjectValue {
        DynamicPropertyObjectValue {
            value: None,
            dictionary_item_id: Some(item),
            ..value(property, json!(null))
        }
    }

    #[test]
    fn register_type_is_idempotent() {
        let (service, _, _) = create_service(InMemoryDynamicPropertyStore::new());

        assert!(!service.register_type("Product"));
        assert!(service.register_type("Order"));
        assert!(!service.register_type("  "));
        assert_eq!(service.registered_types(), vec!["Order", "Product"]);
    }

    #[tokio::test]
    async fn save_and_get_properties() {
        let (service, _, _) = create_service(InMemoryDynamicPropertyStore::new());
        let property = test_property("Product", "color");

        let saved = service
            .save_dynamic_properties(&[property.clone()])
            .await
            .unwrap();
        assert_eq!(saved.len(), 1);

        let found = service.get_dynamic_properties(&[property.id]).await.unwrap();
        assert_eq!(found[0].name, "color");
    }

    #[tokio::test]
    async fn save_rejects_unregistered_object_type() {
        let (service, _, region) = create_service(InMemoryDynamicPropertyStore::new());
        let token = region.token();

        let result = service
            .save_dynamic_properties(&[test_property("Spaceship", "color")])
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        // Nothing reached the store, so nothing to invalidate
        assert!(region.is_current(&token));
    }

    #[tokio::test]
    async fn save_rejects_empty_name() {
        let (service, _, _) = create_service(InMemoryDynamicPropertyStore::new());

        let result = service
            .save_dynamic_properties(&[test_property("Product", " ")])
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn save_rejects_duplicate_name() {
        let existing = test_property("Product", "color");
        let (service, _, _) =
            create_service(InMemoryDynamicPropertyStore::new().with_property(existing));

        let result = service
            .save_dynamic_properties(&[test_property("Product", "color")])
            .await;
        assert!(matches!(result, Err(DomainError::AlreadyExists(_))));

        let batch = [test_property("Product", "size"), test_property("Product", "size")];
        let result = service.save_dynamic_properties(&batch).await;
        assert!(matches!(result, Err(DomainError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn update_keeps_name_of_same_property() {
        let mut existing = test_property("Product", "color");
        let (service, _, _) =
            create_service(InMemoryDynamicPropertyStore::new().with_property(existing.clone()));

        existing.description = Some("Primary color".to_string());
        let saved = service.save_dynamic_properties(&[existing]).await.unwrap();

        assert_eq!(saved[0].description.as_deref(), Some("Primary color"));
        assert!(saved[0].modified_at.is_some());
    }

    #[tokio::test]
    async fn writes_expire_region() {
        let (service, _, region) = create_service(InMemoryDynamicPropertyStore::new());
        let property = test_property("Product", "color");

        let token = region.token();
        service.save_dynamic_properties(&[property.clone()]).await.unwrap();
        assert!(!region.is_current(&token));

        let token = region.token();
        service.delete_dynamic_properties(&[property.id]).await.unwrap();
        assert!(!region.is_current(&token));
    }

    #[tokio::test]
    async fn failed_write_still_expires_region() {
        let (service, store, region) = create_service(InMemoryDynamicPropertyStore::new());
        store.set_failing_writes(true);
        let token = region.token();

        let result = service
            .save_dynamic_properties(&[test_property("Product", "color")])
            .await;

        assert!(matches!(result, Err(DomainError::Transient(_))));
        assert!(!region.is_current(&token));
    }

    #[tokio::test]
    async fn dictionary_with_items_keeps_its_type() {
        let property = test_dictionary_property("Product", "material");
        let item = test_dictionary_item(property.id, "cotton");
        let (service, store, region) = create_service(
            InMemoryDynamicPropertyStore::new()
                .with_property(property.clone())
                .with_item(item.clone()),
        );
        let token = region.token();

        let mut retyped = property.clone();
        retyped.value_type = DynamicPropertyValueType::ShortText;
        let result = service.save_dynamic_properties(&[retyped.clone()]).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(region.is_current(&token));
        let stored = DynamicPropertyRepository::find_by_ids(&*store, &[property.id])
            .await
            .unwrap();
        assert!(stored[0].value_type.is_dictionary());

        // Once the items are gone the type may change
        DictionaryItemRepository::delete(&*store, &[item.id])
            .await
            .unwrap();
        let saved = service.save_dynamic_properties(&[retyped]).await.unwrap();
        assert_eq!(saved[0].value_type, DynamicPropertyValueType::ShortText);
    }

    #[tokio::test]
    async fn delete_cascades_items_but_keeps_values() {
        let property = test_dictionary_property("Product", "material");
        let item = test_dictionary_item(property.id, "cotton");
        let (service, store, _) = create_service(
            InMemoryDynamicPropertyStore::new()
                .with_property(property.clone())
                .with_item(item.clone()),
        );

        service
            .save_object_values("Product", "p-1", &[item_value(&property, item.id)])
            .await
            .unwrap();

        let removed = service.delete_dynamic_properties(&[property.id]).await.unwrap();
        assert_eq!(removed, 1);

        let items = DictionaryItemRepository::find_by_ids(&*store, &[item.id])
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(service.get_object_values("Product", "p-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_object_values_replaces_previous() {
        let property = test_property("Product", "title");
        let (service, _, _) =
            create_service(InMemoryDynamicPropertyStore::new().with_property(property.clone()));

        service
            .save_object_values("Product", "p-1", &[value(&property, json!("Old"))])
            .await
            .unwrap();
        service
            .save_object_values("Product", "p-1", &[value(&property, json!("New"))])
            .await
            .unwrap();

        let values = service.get_object_values("Product", "p-1").await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, Some(json!("New")));
    }

    #[tokio::test]
    async fn save_object_values_checks_value_type() {
        let mut property = test_property("Product", "weight");
        property.value_type = DynamicPropertyValueType::Decimal;
        let (service, _, _) =
            create_service(InMemoryDynamicPropertyStore::new().with_property(property.clone()));

        let result = service
            .save_object_values("Product", "p-1", &[value(&property, json!("heavy"))])
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        service
            .save_object_values("Product", "p-1", &[value(&property, json!(1.5))])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn save_object_values_rejects_unknown_property() {
        let property = test_property("Product", "title");
        let (service, _, _) = create_service(InMemoryDynamicPropertyStore::new());

        let result = service
            .save_object_values("Product", "p-1", &[value(&property, json!("x"))])
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn save_object_values_requires_item_of_property() {
        let property = test_dictionary_property("Product", "material");
        let other = test_dictionary_property("Product", "finish");
        let foreign = test_dictionary_item(other.id, "matte");
        let (service, _, _) = create_service(
            InMemoryDynamicPropertyStore::new()
                .with_property(property.clone())
                .with_property(other)
                .with_item(foreign.clone()),
        );

        let result = service
            .save_object_values("Product", "p-1", &[item_value(&property, foreign.id)])
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let missing = item_value(&property, DictionaryItemId::new());
        let result = service.save_object_values("Product", "p-1", &[missing]).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn single_value_properties_take_one_value_per_locale() {
        let mut property = test_property("Product", "title");
        let (service, _, _) =
            create_service(InMemoryDynamicPropertyStore::new().with_property(property.clone()));

        let mut en = value(&property, json!("Shirt"));
        en.locale = Some("en-US".to_string());
        let mut de = value(&property, json!("Hemd"));
        de.locale = Some("de-DE".to_string());
        service
            .save_object_values("Product", "p-1", &[en.clone(), de])
            .await
            .unwrap();

        let result = service
            .save_object_values("Product", "p-1", &[en.clone(), en.clone()])
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        property.is_array = true;
        service.save_dynamic_properties(&[property]).await.unwrap();
        service
            .save_object_values("Product", "p-1", &[en.clone(), en])
            .await
            .unwrap();
    }
}
