//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entities::{
    DictionaryItem, DictionaryItemId, DictionaryItemQuery, DictionaryItemSortColumn,
    DynamicProperty, DynamicPropertyId, DynamicPropertyObjectValue, FulfillmentCenter,
    FulfillmentCenterId, IdPage, InventoryId, InventoryInfo, Notification, NotificationId,
    OrderBy, PaymentPlan, PaymentPlanId, PropertyQuery, PropertySortColumn, SortDirection,
    TenantIdentity,
};
use crate::domain::ports::{
    DictionaryItemRepository, DynamicPropertyRepository, FulfillmentCenterRepository,
    InventoryRepository, NotificationRepository, PaymentPlanRepository,
};
use crate::error::DomainError;

/// Unset values sort after set ones when ascending, like PostgreSQL
fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    (a.is_none(), a).cmp(&(b.is_none(), b))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn page<I: Clone>(sorted: &[I], skip: u64, take: u64) -> Vec<I> {
    sorted
        .iter()
        .skip(skip as usize)
        .take(take as usize)
        .cloned()
        .collect()
}

// ============================================================================
// In-Memory Dynamic Property Store
// ============================================================================

/// Properties, dictionary items and object values in one store
///
/// Implements both [`DynamicPropertyRepository`] and [`DictionaryItemRepository`]
/// so property deletes can cascade to items. `search_ids` calls are counted
/// and can be slowed down to exercise cache coalescing.
#[derive(Default)]
pub struct InMemoryDynamicPropertyStore {
    properties: Arc<RwLock<HashMap<DynamicPropertyId, DynamicProperty>>>,
    items: Arc<RwLock<HashMap<DictionaryItemId, DictionaryItem>>>,
    values: Arc<RwLock<Vec<DynamicPropertyObjectValue>>>,
    search_calls: Arc<AtomicUsize>,
    search_delay: Option<Duration>,
    pub should_fail: Arc<RwLock<bool>>,
    pub fail_writes: Arc<RwLock<bool>>,
}

impl InMemoryDynamicPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a property for testing
    pub fn with_property(self, property: DynamicProperty) -> Self {
        self.properties
            .write()
            .unwrap()
            .insert(property.id, property);
        self
    }

    /// Pre-populate with a dictionary item for testing
    pub fn with_item(self, item: DictionaryItem) -> Self {
        self.items.write().unwrap().insert(item.id, item);
        self
    }

    /// Make every `search_ids` call take at least `delay`
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = Some(delay);
        self
    }

    /// Number of id queries executed so far (properties and items)
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        *self.should_fail.write().unwrap() = fail;
    }

    /// Fail only saves, deletes and value replacement; reads keep working
    pub fn set_failing_writes(&self, fail: bool) {
        *self.fail_writes.write().unwrap() = fail;
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().unwrap() {
            return Err(DomainError::Transient("store unavailable".to_string()));
        }
        Ok(())
    }

    fn check_write_failure(&self) -> Result<(), DomainError> {
        self.check_failure()?;
        if *self.fail_writes.read().unwrap() {
            return Err(DomainError::Transient("store is read-only".to_string()));
        }
        Ok(())
    }

    async fn begin_search(&self) -> Result<(), DomainError> {
        self.search_calls.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(delay) = self.search_delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure()
    }

    /// Property with `dictionary_item_ids` filled from the stored items
    fn with_item_ids(&self, mut property: DynamicProperty) -> DynamicProperty {
        let items = self.items.read().unwrap();
        let mut owned: Vec<&DictionaryItem> = items
            .values()
            .filter(|i| i.property_id == property.id)
            .collect();
        owned.sort_by(|a, b| DictionaryItem::list_order(a, b));
        property.dictionary_item_ids = owned.into_iter().map(|i| i.id).collect();
        property
    }
}

fn compare_properties(
    a: &DynamicProperty,
    b: &DynamicProperty,
    order: &[OrderBy<PropertySortColumn>],
) -> Ordering {
    for o in order {
        let ordering = match o.column {
            PropertySortColumn::Name => a.name.cmp(&b.name),
            PropertySortColumn::ObjectType => a.object_type.cmp(&b.object_type),
            PropertySortColumn::ValueType => {
                a.value_type.to_string().cmp(&b.value_type.to_string())
            }
            PropertySortColumn::DisplayOrder => nulls_last(&a.display_order, &b.display_order),
            PropertySortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            PropertySortColumn::ModifiedAt => nulls_last(&a.modified_at, &b.modified_at),
        };
        let ordering = directed(ordering, o.direction);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id.cmp(&b.id)
}

fn compare_items(
    a: &DictionaryItem,
    b: &DictionaryItem,
    order: &[OrderBy<DictionaryItemSortColumn>],
) -> Ordering {
    for o in order {
        let ordering = match o.column {
            DictionaryItemSortColumn::Name => a.name.cmp(&b.name),
            DictionaryItemSortColumn::SortOrder => nulls_last(&a.sort_order, &b.sort_order),
        };
        let ordering = directed(ordering, o.direction);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id.cmp(&b.id)
}

#[async_trait]
impl DynamicPropertyRepository for InMemoryDynamicPropertyStore {
    async fn find_by_ids(
        &self,
        ids: &[DynamicPropertyId],
    ) -> Result<Vec<DynamicProperty>, DomainError> {
        self.check_failure()?;
        let mut found: Vec<DynamicProperty> = {
            let properties = self.properties.read().unwrap();
            ids.iter()
                .filter_map(|id| properties.get(id).cloned())
                .collect()
        };
        // Store order, not request order
        found.sort_by_key(|p| p.id);
        found.dedup_by_key(|p| p.id);
        Ok(found.into_iter().map(|p| self.with_item_ids(p)).collect())
    }

    async fn find_by_name(
        &self,
        object_type: &str,
        name: &str,
    ) -> Result<Option<DynamicProperty>, DomainError> {
        self.check_failure()?;
        let found = self
            .properties
            .read()
            .unwrap()
            .values()
            .find(|p| p.object_type == object_type && p.name == name)
            .cloned();
        Ok(found.map(|p| self.with_item_ids(p)))
    }

    async fn search_ids(
        &self,
        query: &PropertyQuery,
    ) -> Result<IdPage<DynamicPropertyId>, DomainError> {
        self.begin_search().await?;

        let properties = self.properties.read().unwrap();
        let mut matches: Vec<&DynamicProperty> = properties
            .values()
            .filter(|p| {
                query
                    .object_type
                    .as_ref()
                    .map_or(true, |t| &p.object_type == t)
            })
            .filter(|p| {
                query.object_types.is_empty() || query.object_types.contains(&p.object_type)
            })
            .filter(|p| {
                query
                    .keyword
                    .as_ref()
                    .map_or(true, |k| p.name.contains(k.as_str()))
            })
            .collect();
        matches.sort_by(|a, b| compare_properties(a, b, &query.order));

        let ids: Vec<DynamicPropertyId> = matches.iter().map(|p| p.id).collect();
        Ok(IdPage {
            total_count: ids.len() as u64,
            ids: page(&ids, query.skip, query.take),
        })
    }

    async fn save(
        &self,
        properties: &[DynamicProperty],
    ) -> Result<Vec<DynamicProperty>, DomainError> {
        self.check_write_failure()?;
        let now = Utc::now();
        {
            let mut stored = self.properties.write().unwrap();
            for property in properties {
                let duplicate = stored.values().any(|p| {
                    p.id != property.id
                        && p.object_type == property.object_type
                        && p.name == property.name
                });
                if duplicate {
                    return Err(DomainError::AlreadyExists(format!(
                        "duplicate key value violates unique constraint ({}, {})",
                        property.object_type, property.name
                    )));
                }

                let mut property = property.clone();
                match stored.get(&property.id) {
                    Some(existing) => {
                        property.created_at = existing.created_at;
                        property.modified_at = Some(now);
                    }
                    None => {
                        property.created_at = now;
                        property.modified_at = None;
                    }
                }
                stored.insert(property.id, property);
            }
        }

        let ids: Vec<DynamicPropertyId> = properties.iter().map(|p| p.id).collect();
        DynamicPropertyRepository::find_by_ids(self, &ids).await
    }

    async fn delete(&self, ids: &[DynamicPropertyId]) -> Result<u64, DomainError> {
        self.check_write_failure()?;
        self.items
            .write()
            .unwrap()
            .retain(|_, item| !ids.contains(&item.property_id));

        let mut properties = self.properties.write().unwrap();
        let removed = ids.iter().filter(|id| properties.remove(id).is_some()).count();
        Ok(removed as u64)
    }

    async fn find_object_values(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<Vec<DynamicPropertyObjectValue>, DomainError> {
        self.check_failure()?;
        Ok(self
            .values
            .read()
            .unwrap()
            .iter()
            .filter(|v| v.object_type == object_type && v.object_id == object_id)
            .cloned()
            .collect())
    }

    async fn replace_object_values(
        &self,
        object_type: &str,
        object_id: &str,
        values: &[DynamicPropertyObjectValue],
    ) -> Result<(), DomainError> {
        self.check_write_failure()?;
        let mut stored = self.values.write().unwrap();
        stored.retain(|v| !(v.object_type == object_type && v.object_id == object_id));
        stored.extend(values.iter().cloned());
        Ok(())
    }
}

#[async_trait]
impl DictionaryItemRepository for InMemoryDynamicPropertyStore {
    async fn find_by_ids(
        &self,
        ids: &[DictionaryItemId],
    ) -> Result<Vec<DictionaryItem>, DomainError> {
        self.check_failure()?;
        let items = self.items.read().unwrap();
        let mut found: Vec<DictionaryItem> =
            ids.iter().filter_map(|id| items.get(id).cloned()).collect();
        found.sort_by_key(|i| i.id);
        found.dedup_by_key(|i| i.id);
        Ok(found)
    }

    async fn find_by_property(
        &self,
        property_id: &DynamicPropertyId,
    ) -> Result<Vec<DictionaryItem>, DomainError> {
        self.check_failure()?;
        let mut found: Vec<DictionaryItem> = self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|i| &i.property_id == property_id)
            .cloned()
            .collect();
        found.sort_by(DictionaryItem::list_order);
        Ok(found)
    }

    async fn search_ids(
        &self,
        query: &DictionaryItemQuery,
    ) -> Result<IdPage<DictionaryItemId>, DomainError> {
        self.begin_search().await?;

        let items = self.items.read().unwrap();
        let mut matches: Vec<&DictionaryItem> = items
            .values()
            .filter(|i| query.property_id.map_or(true, |p| i.property_id == p))
            .filter(|i| {
                query
                    .keyword
                    .as_ref()
                    .map_or(true, |k| i.name.contains(k.as_str()))
            })
            .collect();
        matches.sort_by(|a, b| compare_items(a, b, &query.order));

        let ids: Vec<DictionaryItemId> = matches.iter().map(|i| i.id).collect();
        Ok(IdPage {
            total_count: ids.len() as u64,
            ids: page(&ids, query.skip, query.take),
        })
    }

    async fn save(&self, items: &[DictionaryItem]) -> Result<Vec<DictionaryItem>, DomainError> {
        self.check_write_failure()?;
        let mut stored = self.items.write().unwrap();
        for item in items {
            stored.insert(item.id, item.clone());
        }
        Ok(items.to_vec())
    }

    async fn delete(&self, ids: &[DictionaryItemId]) -> Result<u64, DomainError> {
        self.check_write_failure()?;
        let mut items = self.items.write().unwrap();
        let removed = ids.iter().filter(|id| items.remove(id).is_some()).count();
        Ok(removed as u64)
    }
}

// ============================================================================
// In-Memory Notification Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<HashMap<NotificationId, Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a stored definition, assigning an id when missing
    pub fn with_notification(self, mut notification: Notification) -> Self {
        let id = *notification.id.get_or_insert_with(NotificationId::new);
        self.notifications.write().unwrap().insert(id, notification);
        self
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn find_by_type(
        &self,
        notification_type: &str,
        tenant: Option<&TenantIdentity>,
    ) -> Result<Option<Notification>, DomainError> {
        let notifications = self.notifications.read().unwrap();
        Ok(notifications
            .values()
            .find(|n| n.notification_type == notification_type && n.tenant.as_ref() == tenant)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[NotificationId]) -> Result<Vec<Notification>, DomainError> {
        let notifications = self.notifications.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| notifications.get(id).cloned())
            .collect())
    }

    async fn save(
        &self,
        to_save: &[Notification],
    ) -> Result<Vec<Notification>, DomainError> {
        let mut notifications = self.notifications.write().unwrap();
        let mut saved = Vec::with_capacity(to_save.len());
        for notification in to_save {
            let mut notification = notification.clone();
            let id = *notification.id.get_or_insert_with(NotificationId::new);
            notifications.insert(id, notification.clone());
            saved.push(notification);
        }
        Ok(saved)
    }
}

// ============================================================================
// In-Memory Payment Plan Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryPaymentPlanRepository {
    plans: Arc<RwLock<HashMap<PaymentPlanId, PaymentPlan>>>,
}

impl InMemoryPaymentPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a plan for testing
    pub fn with_plan(self, plan: PaymentPlan) -> Self {
        self.plans.write().unwrap().insert(plan.id, plan);
        self
    }
}

#[async_trait]
impl PaymentPlanRepository for InMemoryPaymentPlanRepository {
    async fn find_by_ids(&self, ids: &[PaymentPlanId]) -> Result<Vec<PaymentPlan>, DomainError> {
        let plans = self.plans.read().unwrap();
        Ok(ids.iter().filter_map(|id| plans.get(id).cloned()).collect())
    }

    async fn save(&self, to_save: &[PaymentPlan]) -> Result<Vec<PaymentPlan>, DomainError> {
        let now = Utc::now();
        let mut plans = self.plans.write().unwrap();
        let mut saved = Vec::with_capacity(to_save.len());
        for plan in to_save {
            let mut plan = plan.clone();
            match plans.get(&plan.id) {
                Some(existing) => {
                    plan.created_at = existing.created_at;
                    plan.created_by = existing.created_by.clone();
                    plan.modified_at = Some(now);
                }
                None => plan.created_at = now,
            }
            plans.insert(plan.id, plan.clone());
            saved.push(plan);
        }
        Ok(saved)
    }

    async fn delete(&self, ids: &[PaymentPlanId]) -> Result<u64, DomainError> {
        let mut plans = self.plans.write().unwrap();
        let removed = ids.iter().filter(|id| plans.remove(id).is_some()).count();
        Ok(removed as u64)
    }
}

// ============================================================================
// In-Memory Inventory Store
// ============================================================================

/// Fulfillment centers and stock records in one store
///
/// Implements both [`FulfillmentCenterRepository`] and [`InventoryRepository`]
/// so deleting a center can detach its stock.
#[derive(Default)]
pub struct InMemoryInventoryStore {
    centers: Arc<RwLock<HashMap<FulfillmentCenterId, FulfillmentCenter>>>,
    records: Arc<RwLock<HashMap<InventoryId, InventoryInfo>>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a fulfillment center for testing
    pub fn with_center(self, center: FulfillmentCenter) -> Self {
        self.centers.write().unwrap().insert(center.id, center);
        self
    }

    /// Pre-populate with a stock record for testing
    pub fn with_record(self, record: InventoryInfo) -> Self {
        self.records.write().unwrap().insert(record.id, record);
        self
    }
}

#[async_trait]
impl FulfillmentCenterRepository for InMemoryInventoryStore {
    async fn find_by_ids(
        &self,
        ids: &[FulfillmentCenterId],
    ) -> Result<Vec<FulfillmentCenter>, DomainError> {
        let centers = self.centers.read().unwrap();
        Ok(ids.iter().filter_map(|id| centers.get(id).cloned()).collect())
    }

    async fn find_all(&self) -> Result<Vec<FulfillmentCenter>, DomainError> {
        let mut all: Vec<FulfillmentCenter> =
            self.centers.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn save(
        &self,
        to_save: &[FulfillmentCenter],
    ) -> Result<Vec<FulfillmentCenter>, DomainError> {
        let now = Utc::now();
        let mut centers = self.centers.write().unwrap();
        let mut saved = Vec::with_capacity(to_save.len());
        for center in to_save {
            let mut center = center.clone();
            match centers.get(&center.id) {
                Some(existing) => {
                    center.created_at = existing.created_at;
                    center.modified_at = Some(now);
                }
                None => {
                    center.created_at = now;
                    center.modified_at = None;
                }
            }
            centers.insert(center.id, center.clone());
            saved.push(center);
        }
        Ok(saved)
    }

    async fn delete(&self, ids: &[FulfillmentCenterId]) -> Result<u64, DomainError> {
        for record in self.records.write().unwrap().values_mut() {
            if record
                .fulfillment_center_id
                .map_or(false, |id| ids.contains(&id))
            {
                record.fulfillment_center_id = None;
            }
        }

        let mut centers = self.centers.write().unwrap();
        let removed = ids.iter().filter(|id| centers.remove(id).is_some()).count();
        Ok(removed as u64)
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryStore {
    async fn find_by_ids(&self, ids: &[InventoryId]) -> Result<Vec<InventoryInfo>, DomainError> {
        let records = self.records.read().unwrap();
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn find_by_products(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<InventoryInfo>, DomainError> {
        let mut found: Vec<InventoryInfo> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| product_ids.contains(&r.product_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.product_id
                .cmp(&b.product_id)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(found)
    }

    async fn save(&self, to_save: &[InventoryInfo]) -> Result<Vec<InventoryInfo>, DomainError> {
        let now = Utc::now();
        let mut records = self.records.write().unwrap();
        let mut saved = Vec::with_capacity(to_save.len());
        for record in to_save {
            let duplicate = records.values().any(|r| {
                r.id != record.id
                    && r.product_id == record.product_id
                    && r.fulfillment_center_id.is_some()
                    && r.fulfillment_center_id == record.fulfillment_center_id
            });
            if duplicate {
                return Err(DomainError::AlreadyExists(format!(
                    "duplicate key value violates unique constraint ({})",
                    record.product_id
                )));
            }

            let mut record = record.clone();
            match records.get(&record.id) {
                Some(existing) => {
                    record.created_at = existing.created_at;
                    record.modified_at = Some(now);
                }
                None => {
                    record.created_at = now;
                    record.modified_at = None;
                }
            }
            records.insert(record.id, record.clone());
            saved.push(record);
        }
        Ok(saved)
    }

    async fn delete(&self, ids: &[InventoryId]) -> Result<u64, DomainError> {
        let mut records = self.records.write().unwrap();
        let removed = ids.iter().filter(|id| records.remove(id).is_some()).count();
        Ok(removed as u64)
    }
}
