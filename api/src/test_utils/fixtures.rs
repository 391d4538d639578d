//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{
    Address, DictionaryItem, DictionaryItemId, DynamicProperty, DynamicPropertyId,
    DynamicPropertyValueType, FulfillmentCenter, FulfillmentCenterId, InventoryId, InventoryInfo,
    InventoryStatus, Notification, NotificationKind, NotificationTemplate, PaymentInterval,
    PaymentPlan, PaymentPlanId,
};

/// Create a short text property on an object type
pub fn test_property(object_type: &str, name: &str) -> DynamicProperty {
    DynamicProperty {
        id: DynamicPropertyId(Uuid::new_v4()),
        object_type: object_type.to_string(),
        name: name.to_string(),
        description: None,
        value_type: DynamicPropertyValueType::ShortText,
        is_array: false,
        is_required: false,
        display_order: None,
        display_names: vec![],
        dictionary_item_ids: vec![],
        created_at: Utc::now(),
        modified_at: None,
    }
}

/// Create a property with a fixed id, for tests that depend on id order
pub fn test_property_with_id(id: u128, object_type: &str, name: &str) -> DynamicProperty {
    DynamicProperty {
        id: DynamicPropertyId(Uuid::from_u128(id)),
        ..test_property(object_type, name)
    }
}

/// Create a dictionary-typed property
pub fn test_dictionary_property(object_type: &str, name: &str) -> DynamicProperty {
    DynamicProperty {
        value_type: DynamicPropertyValueType::Dictionary,
        ..test_property(object_type, name)
    }
}

/// Create a dictionary item owned by `property_id`
pub fn test_dictionary_item(property_id: DynamicPropertyId, name: &str) -> DictionaryItem {
    DictionaryItem {
        id: DictionaryItemId(Uuid::new_v4()),
        property_id,
        name: name.to_string(),
        sort_order: None,
        display_names: vec![],
    }
}

/// Create an email notification of the given type with one English template
pub fn test_email_notification(notification_type: &str) -> Notification {
    let mut notification = Notification::new(notification_type, NotificationKind::email());
    notification.templates = vec![NotificationTemplate {
        language_code: "en-US".to_string(),
        subject: Some("Default subject".to_string()),
        body: "Default body".to_string(),
    }];
    notification
}

/// Create a monthly payment plan without trial
pub fn test_payment_plan() -> PaymentPlan {
    PaymentPlan {
        id: PaymentPlanId(Uuid::new_v4()),
        interval: PaymentInterval::Months,
        interval_count: 1,
        trial_period_days: 0,
        created_at: Utc::now(),
        created_by: None,
        modified_at: None,
        modified_by: None,
    }
}

/// Create a fulfillment center without an address
pub fn test_fulfillment_center(name: &str) -> FulfillmentCenter {
    FulfillmentCenter {
        id: FulfillmentCenterId(Uuid::new_v4()),
        name: name.to_string(),
        description: None,
        address: Address::default(),
        created_at: Utc::now(),
        modified_at: None,
    }
}

/// Create an enabled stock record with nothing reserved
pub fn test_inventory(
    product_id: &str,
    center: Option<FulfillmentCenterId>,
    in_stock: i64,
) -> InventoryInfo {
    InventoryInfo {
        id: InventoryId(Uuid::new_v4()),
        product_id: product_id.to_string(),
        fulfillment_center_id: center,
        status: InventoryStatus::Enabled,
        in_stock_quantity: in_stock,
        reserved_quantity: 0,
        reorder_min_quantity: 0,
        allow_backorder: false,
        backorder_quantity: 0,
        backorder_available_date: None,
        allow_preorder: false,
        preorder_quantity: 0,
        preorder_available_date: None,
        created_at: Utc::now(),
        modified_at: None,
    }
}
