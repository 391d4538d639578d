//! SeaORM entities
//!
//! Table mappings for the PostgreSQL schema. Migrations are applied by the host.

pub mod dynamic_properties;
pub mod dynamic_property_dictionary_items;
pub mod dynamic_property_object_values;
pub mod fulfillment_centers;
pub mod inventories;
pub mod notifications;
pub mod payment_plans;
