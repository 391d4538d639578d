//! Inventory domain entities
//!
//! Stock levels of products per fulfillment center. A center can be removed
//! while stock still points at it; that stock becomes unassigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fulfillment center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FulfillmentCenterId(pub Uuid);

impl FulfillmentCenterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FulfillmentCenterId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FulfillmentCenterId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FulfillmentCenterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an inventory record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryId(pub Uuid);

impl InventoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InventoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for InventoryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InventoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Postal address of a fulfillment center
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-3
    pub country_code: Option<String>,
    pub phone: Option<String>,
}

/// A warehouse or store that holds stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentCenter {
    pub id: FulfillmentCenterId,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Whether an inventory record takes part in availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    #[default]
    Enabled,
    Disabled,
    /// Stock is not tracked; the product is always available
    Ignored,
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InventoryStatus::Enabled => write!(f, "enabled"),
            InventoryStatus::Disabled => write!(f, "disabled"),
            InventoryStatus::Ignored => write!(f, "ignored"),
        }
    }
}

impl std::str::FromStr for InventoryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enabled" => Ok(InventoryStatus::Enabled),
            "disabled" => Ok(InventoryStatus::Disabled),
            "ignored" => Ok(InventoryStatus::Ignored),
            _ => Err(format!("Unknown inventory status: {}", s)),
        }
    }
}

/// Stock of one product in one fulfillment center
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryInfo {
    pub id: InventoryId,
    pub product_id: String,
    /// None once the center has been deleted
    pub fulfillment_center_id: Option<FulfillmentCenterId>,
    pub status: InventoryStatus,
    pub in_stock_quantity: i64,
    pub reserved_quantity: i64,
    pub reorder_min_quantity: i64,
    pub allow_backorder: bool,
    pub backorder_quantity: i64,
    pub backorder_available_date: Option<DateTime<Utc>>,
    pub allow_preorder: bool,
    pub preorder_quantity: i64,
    pub preorder_available_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl InventoryInfo {
    /// Units that can be promised to a new order
    ///
    /// Disabled records offer nothing. Reservations never push the figure
    /// below zero, and backorder stock counts only when backorders are allowed.
    pub fn available_quantity(&self) -> i64 {
        if self.status == InventoryStatus::Disabled {
            return 0;
        }
        let on_hand = (self.in_stock_quantity - self.reserved_quantity).max(0);
        if self.allow_backorder {
            on_hand + self.backorder_quantity.max(0)
        } else {
            on_hand
        }
    }

    /// Whether `quantity` units can be sold from this record
    pub fn is_available(&self, quantity: i64) -> bool {
        match self.status {
            InventoryStatus::Ignored => true,
            _ => quantity <= self.available_quantity(),
        }
    }

    /// Stock has dropped to the reorder threshold
    pub fn needs_reorder(&self) -> bool {
        self.status == InventoryStatus::Enabled
            && self.reorder_min_quantity > 0
            && self.in_stock_quantity <= self.reorder_min_quantity
    }
}

/// Stock of one product summed over every fulfillment center
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAvailability {
    pub product_id: String,
    pub in_stock_quantity: i64,
    pub reserved_quantity: i64,
    pub available_quantity: i64,
    /// Some record does not track stock
    pub always_available: bool,
}

impl ProductAvailability {
    /// Sum the records of `product_id`, skipping other products
    pub fn from_records<'a>(
        product_id: &str,
        records: impl IntoIterator<Item = &'a InventoryInfo>,
    ) -> Self {
        let mut availability = ProductAvailability {
            product_id: product_id.to_string(),
            ..Default::default()
        };

        for record in records.into_iter().filter(|r| r.product_id == product_id) {
            if record.status == InventoryStatus::Disabled {
                continue;
            }
            availability.in_stock_quantity += record.in_stock_quantity;
            availability.reserved_quantity += record.reserved_quantity;
            availability.available_quantity += record.available_quantity();
            availability.always_available |= record.status == InventoryStatus::Ignored;
        }

        availability
    }
}
