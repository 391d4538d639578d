//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::domain::entities::{
    DictionaryItem, DictionaryItemId, DictionaryItemQuery, DynamicProperty, DynamicPropertyId,
    DynamicPropertyObjectValue, FulfillmentCenter, FulfillmentCenterId, IdPage, InventoryId,
    InventoryInfo, Notification, NotificationId, PaymentPlan, PaymentPlanId, PropertyQuery,
    TenantIdentity,
};
use crate::error::DomainError;

/// Repository for dynamic property definitions and their object values
#[async_trait]
pub trait DynamicPropertyRepository: Send + Sync {
    /// Load properties by id, in no particular order. Unknown ids are skipped.
    ///
    /// Dictionary properties come with `dictionary_item_ids` filled in.
    async fn find_by_ids(
        &self,
        ids: &[DynamicPropertyId],
    ) -> Result<Vec<DynamicProperty>, DomainError>;

    /// Find the property with this name on an object type
    async fn find_by_name(
        &self,
        object_type: &str,
        name: &str,
    ) -> Result<Option<DynamicProperty>, DomainError>;

    /// Count matches and select one page of ids
    async fn search_ids(
        &self,
        query: &PropertyQuery,
    ) -> Result<IdPage<DynamicPropertyId>, DomainError>;

    /// Insert new properties and update existing ones
    async fn save(&self, properties: &[DynamicProperty])
        -> Result<Vec<DynamicProperty>, DomainError>;

    /// Delete properties together with their dictionary items. Returns rows removed.
    ///
    /// Object values referencing the properties are left in place.
    async fn delete(&self, ids: &[DynamicPropertyId]) -> Result<u64, DomainError>;

    /// All values stored for one object
    async fn find_object_values(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<Vec<DynamicPropertyObjectValue>, DomainError>;

    /// Replace every value stored for one object
    async fn replace_object_values(
        &self,
        object_type: &str,
        object_id: &str,
        values: &[DynamicPropertyObjectValue],
    ) -> Result<(), DomainError>;
}

/// Repository for dictionary items of dictionary-typed properties
#[async_trait]
pub trait DictionaryItemRepository: Send + Sync {
    /// Load items by id, in no particular order. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[DictionaryItemId])
        -> Result<Vec<DictionaryItem>, DomainError>;

    /// All items of one property
    async fn find_by_property(
        &self,
        property_id: &DynamicPropertyId,
    ) -> Result<Vec<DictionaryItem>, DomainError>;

    /// Count matches and select one page of ids
    async fn search_ids(
        &self,
        query: &DictionaryItemQuery,
    ) -> Result<IdPage<DictionaryItemId>, DomainError>;

    /// Insert new items and update existing ones
    async fn save(&self, items: &[DictionaryItem]) -> Result<Vec<DictionaryItem>, DomainError>;

    /// Delete items. Returns rows removed.
    async fn delete(&self, ids: &[DictionaryItemId]) -> Result<u64, DomainError>;
}

/// Repository for stored notification definitions
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Find the stored definition of a type, optionally for one tenant
    async fn find_by_type(
        &self,
        notification_type: &str,
        tenant: Option<&TenantIdentity>,
    ) -> Result<Option<Notification>, DomainError>;

    async fn find_by_ids(&self, ids: &[NotificationId]) -> Result<Vec<Notification>, DomainError>;

    /// Insert new definitions (assigning ids) and update existing ones
    async fn save(&self, notifications: &[Notification])
        -> Result<Vec<Notification>, DomainError>;
}

/// Repository for subscription payment plans
#[async_trait]
pub trait PaymentPlanRepository: Send + Sync {
    async fn find_by_ids(&self, ids: &[PaymentPlanId]) -> Result<Vec<PaymentPlan>, DomainError>;

    /// Insert new plans and update existing ones
    async fn save(&self, plans: &[PaymentPlan]) -> Result<Vec<PaymentPlan>, DomainError>;

    /// Delete plans. Returns rows removed.
    async fn delete(&self, ids: &[PaymentPlanId]) -> Result<u64, DomainError>;
}

/// Repository for fulfillment centers
#[async_trait]
pub trait FulfillmentCenterRepository: Send + Sync {
    /// Load centers by id, in no particular order. Unknown ids are skipped.
    async fn find_by_ids(
        &self,
        ids: &[FulfillmentCenterId],
    ) -> Result<Vec<FulfillmentCenter>, DomainError>;

    /// Every center, ordered by name
    async fn find_all(&self) -> Result<Vec<FulfillmentCenter>, DomainError>;

    /// Insert new centers and update existing ones
    async fn save(
        &self,
        centers: &[FulfillmentCenter],
    ) -> Result<Vec<FulfillmentCenter>, DomainError>;

    /// Delete centers. Returns rows removed.
    ///
    /// Inventory records of a deleted center stay, with no center set.
    async fn delete(&self, ids: &[FulfillmentCenterId]) -> Result<u64, DomainError>;
}

/// Repository for product stock records
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Load records by id, in no particular order. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[InventoryId]) -> Result<Vec<InventoryInfo>, DomainError>;

    /// Every record of the given products
    async fn find_by_products(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<InventoryInfo>, DomainError>;

    /// Insert new records and update existing ones
    async fn save(&self, records: &[InventoryInfo]) -> Result<Vec<InventoryInfo>, DomainError>;

    /// Delete records. Returns rows removed.
    async fn delete(&self, ids: &[InventoryId]) -> Result<u64, DomainError>;
}
