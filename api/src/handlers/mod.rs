//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod commerce_methods;
pub mod dynamic_properties;
pub mod inventory;
pub mod notifications;
pub mod payment_plans;

pub use commerce_methods::{get_method, list_methods};
pub use dynamic_properties::{
    delete_dictionary_items, delete_properties, get_dictionary_items, get_object_values,
    get_properties, list_types, register_types, save_dictionary_items, save_object_values,
    save_properties, search_dictionary_items, search_properties,
};
pub use inventory::{
    delete_fulfillment_centers, delete_inventories, get_fulfillment_centers, get_inventories,
    get_product_availability, get_product_inventories, save_fulfillment_centers, save_inventories,
};
pub use notifications::{
    get_notification, get_notifications, list_notification_types, save_notifications,
};
pub use payment_plans::{delete_plans, get_plans, save_plans};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// `?ids=a,b,c` for batch get and delete endpoints
#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    #[serde(default)]
    pub ids: String,
}

impl IdsQuery {
    /// Parse the comma separated ids, skipping blanks
    pub fn parse<I: From<Uuid>>(&self) -> Result<Vec<I>, AppError> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Uuid::parse_str(s)
                    .map(I::from)
                    .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", s)))
            })
            .collect()
    }
}

/// Response for delete endpoints
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}
