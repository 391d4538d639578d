//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod commerce_method;
pub mod dictionary_item;
pub mod dynamic_property;
pub mod inventory;
pub mod notification;
pub mod payment_plan;
pub mod search;

pub use commerce_method::{CommerceMethod, MethodKind};
pub use dictionary_item::{DictionaryItem, DictionaryItemId};
pub use dynamic_property::{
    DynamicProperty, DynamicPropertyId, DynamicPropertyObjectValue, DynamicPropertyValueType,
    LocalizedName,
};
pub use inventory::{
    Address, FulfillmentCenter, FulfillmentCenterId, InventoryId, InventoryInfo, InventoryStatus,
    ProductAvailability,
};
pub use notification::{
    Notification, NotificationId, NotificationKind, NotificationTemplate, TenantIdentity,
};
pub use payment_plan::{PaymentInterval, PaymentPlan, PaymentPlanId};
pub use search::{
    reorder_by_ids, DictionaryItemQuery, DictionaryItemSearchCriteria, DictionaryItemSortColumn,
    DynamicPropertySearchCriteria, IdPage, OrderBy, PropertyQuery, PropertySortColumn,
    SearchResult, SortDirection,
};
