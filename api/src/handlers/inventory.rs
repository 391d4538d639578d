//! Inventory handlers
//!
//! Fulfillment centers, stock records and per-product availability.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{DeleteResponse, IdsQuery};
use crate::domain::entities::{
    Address, FulfillmentCenter, FulfillmentCenterId, InventoryId, InventoryInfo, InventoryStatus,
    ProductAvailability,
};
use crate::error::AppError;
use crate::AppState;

/// A fulfillment center to create (no id) or update
#[derive(Debug, Deserialize)]
pub struct FulfillmentCenterInput {
    pub id: Option<FulfillmentCenterId>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub address: Address,
}

impl From<FulfillmentCenterInput> for FulfillmentCenter {
    fn from(input: FulfillmentCenterInput) -> Self {
        FulfillmentCenter {
            id: input.id.unwrap_or_default(),
            name: input.name,
            description: input.description,
            address: input.address,
            created_at: Utc::now(),
            modified_at: None,
        }
    }
}

/// A stock record to create (no id) or update
#[derive(Debug, Deserialize)]
pub struct InventoryInput {
    pub id: Option<InventoryId>,
    pub product_id: String,
    pub fulfillment_center_id: Option<FulfillmentCenterId>,
    #[serde(default)]
    pub status: InventoryStatus,
    #[serde(default)]
    pub in_stock_quantity: i64,
    #[serde(default)]
    pub reserved_quantity: i64,
    #[serde(default)]
    pub reorder_min_quantity: i64,
    #[serde(default)]
    pub allow_backorder: bool,
    #[serde(default)]
    pub backorder_quantity: i64,
    pub backorder_available_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub allow_preorder: bool,
    #[serde(default)]
    pub preorder_quantity: i64,
    pub preorder_available_date: Option<DateTime<Utc>>,
}

impl From<InventoryInput> for InventoryInfo {
    fn from(input: InventoryInput) -> Self {
        InventoryInfo {
            id: input.id.unwrap_or_default(),
            product_id: input.product_id,
            fulfillment_center_id: input.fulfillment_center_id,
            status: input.status,
            in_stock_quantity: input.in_stock_quantity,
            reserved_quantity: input.reserved_quantity,
            reorder_min_quantity: input.reorder_min_quantity,
            allow_backorder: input.allow_backorder,
            backorder_quantity: input.backorder_quantity,
            backorder_available_date: input.backorder_available_date,
            allow_preorder: input.allow_preorder,
            preorder_quantity: input.preorder_quantity,
            preorder_available_date: input.preorder_available_date,
            created_at: Utc::now(),
            modified_at: None,
        }
    }
}

/// `?ids=sku-1,sku-2` with product ids, which are not uuids
#[derive(Debug, Default, Deserialize)]
pub struct ProductIdsQuery {
    #[serde(default)]
    pub ids: String,
}

impl ProductIdsQuery {
    pub fn product_ids(&self) -> Vec<String> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// GET /api/inventory/fulfillmentcenters[?ids=a,b]
///
/// Without ids every center is listed.
pub async fn get_fulfillment_centers(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<FulfillmentCenter>>, AppError> {
    let ids: Vec<FulfillmentCenterId> = query.parse()?;
    let centers = if ids.is_empty() {
        state.inventory_service.list_fulfillment_centers().await?
    } else {
        state.inventory_service.get_fulfillment_centers(&ids).await?
    };
    Ok(Json(centers))
}

/// PUT /api/inventory/fulfillmentcenters
pub async fn save_fulfillment_centers(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<FulfillmentCenterInput>>,
) -> Result<Json<Vec<FulfillmentCenter>>, AppError> {
    let centers: Vec<FulfillmentCenter> = inputs.into_iter().map(Into::into).collect();
    let saved = state
        .inventory_service
        .save_fulfillment_centers(&centers)
        .await?;
    Ok(Json(saved))
}

/// DELETE /api/inventory/fulfillmentcenters?ids=a,b
pub async fn delete_fulfillment_centers(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let ids: Vec<FulfillmentCenterId> = query.parse()?;
    let deleted = state
        .inventory_service
        .delete_fulfillment_centers(&ids)
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// GET /api/inventory?ids=a,b
pub async fn get_inventories(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<InventoryInfo>>, AppError> {
    let ids: Vec<InventoryId> = query.parse()?;
    let records = state.inventory_service.get_inventories(&ids).await?;
    Ok(Json(records))
}

/// PUT /api/inventory
pub async fn save_inventories(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<InventoryInput>>,
) -> Result<Json<Vec<InventoryInfo>>, AppError> {
    let records: Vec<InventoryInfo> = inputs.into_iter().map(Into::into).collect();
    let saved = state.inventory_service.save_inventories(&records).await?;
    Ok(Json(saved))
}

/// DELETE /api/inventory?ids=a,b
pub async fn delete_inventories(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let ids: Vec<InventoryId> = query.parse()?;
    let deleted = state.inventory_service.delete_inventories(&ids).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// GET /api/inventory/products?ids=sku-1,sku-2
pub async fn get_product_inventories(
    State(state): State<AppState>,
    Query(query): Query<ProductIdsQuery>,
) -> Result<Json<Vec<InventoryInfo>>, AppError> {
    let records = state
        .inventory_service
        .get_product_inventories(&query.product_ids())
        .await?;
    Ok(Json(records))
}

/// GET /api/inventory/availability?ids=sku-1,sku-2
pub async fn get_product_availability(
    State(state): State<AppState>,
    Query(query): Query<ProductIdsQuery>,
) -> Result<Json<Vec<ProductAvailability>>, AppError> {
    let availability = state
        .inventory_service
        .get_product_availability(&query.product_ids())
        .await?;
    Ok(Json(availability))
}
