//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and the shared cache.

pub mod commerce_method_service;
pub mod dictionary_item_service;
pub mod dynamic_property_search_service;
pub mod dynamic_property_service;
pub mod inventory_service;
pub mod notification_service;
pub mod payment_plan_service;

pub use commerce_method_service::CommerceMethodService;
pub use dictionary_item_service::DictionaryItemService;
pub use dynamic_property_search_service::DynamicPropertySearchService;
pub use dynamic_property_service::DynamicPropertyService;
pub use inventory_service::InventoryService;
pub use notification_service::NotificationService;
pub use payment_plan_service::PaymentPlanService;
