//! Inventory service
//!
//! Fulfillment centers and the stock records kept in them. Deleting a center
//! keeps its stock records but leaves them without a center.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::entities::{
    FulfillmentCenter, FulfillmentCenterId, InventoryId, InventoryInfo, ProductAvailability,
};
use crate::domain::ports::{FulfillmentCenterRepository, InventoryRepository};
use crate::error::DomainError;

/// Service for fulfillment centers and product stock
pub struct InventoryService<IR, FR>
where
    IR: InventoryRepository,
    FR: FulfillmentCenterRepository,
{
    inventories: Arc<IR>,
    centers: Arc<FR>,
}

impl<IR, FR> InventoryService<IR, FR>
where
    IR: InventoryRepository,
    FR: FulfillmentCenterRepository,
{
    pub fn new(inventories: Arc<IR>, centers: Arc<FR>) -> Self {
        Self {
            inventories,
            centers,
        }
    }

    /// Every center, ordered by name
    pub async fn list_fulfillment_centers(&self) -> Result<Vec<FulfillmentCenter>, DomainError> {
        self.centers.find_all().await
    }

    pub async fn get_fulfillment_centers(
        &self,
        ids: &[FulfillmentCenterId],
    ) -> Result<Vec<FulfillmentCenter>, DomainError> {
        self.centers.find_by_ids(ids).await
    }

    /// Insert new centers and update existing ones
    pub async fn save_fulfillment_centers(
        &self,
        centers: &[FulfillmentCenter],
    ) -> Result<Vec<FulfillmentCenter>, DomainError> {
        if let Some(unnamed) = centers.iter().find(|c| c.name.trim().is_empty()) {
            return Err(DomainError::Validation(format!(
                "Fulfillment center {} needs a name",
                unnamed.id
            )));
        }

        let saved = self.centers.save(centers).await?;
        tracing::info!("Saved {} fulfillment centers", saved.len());
        Ok(saved)
    }

    /// Delete centers; their stock records stay without a center
    pub async fn delete_fulfillment_centers(
        &self,
        ids: &[FulfillmentCenterId],
    ) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let removed = self.centers.delete(ids).await?;
        tracing::info!("Deleted {} fulfillment centers", removed);
        Ok(removed)
    }

    pub async fn get_inventories(
        &self,
        ids: &[InventoryId],
    ) -> Result<Vec<InventoryInfo>, DomainError> {
        self.inventories.find_by_ids(ids).await
    }

    /// Every stock record of the given products
    pub async fn get_product_inventories(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<InventoryInfo>, DomainError> {
        self.inventories.find_by_products(product_ids).await
    }

    /// Insert new stock records and update existing ones
    ///
    /// A product has at most one record per center and a record may only
    /// point at an existing center.
    pub async fn save_inventories(
        &self,
        records: &[InventoryInfo],
    ) -> Result<Vec<InventoryInfo>, DomainError> {
        self.validate(records).await?;

        let saved = self.inventories.save(records).await?;
        tracing::info!("Saved {} inventory records", saved.len());
        Ok(saved)
    }

    async fn validate(&self, records: &[InventoryInfo]) -> Result<(), DomainError> {
        let mut batch: HashSet<(&str, FulfillmentCenterId)> = HashSet::new();

        for record in records {
            if record.product_id.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "Inventory {} has no product",
                    record.id
                )));
            }

            let quantities = [
                record.in_stock_quantity,
                record.reserved_quantity,
                record.reorder_min_quantity,
                record.backorder_quantity,
                record.preorder_quantity,
            ];
            if quantities.iter().any(|q| *q < 0) {
                return Err(DomainError::Validation(format!(
                    "Inventory of {} has a negative quantity",
                    record.product_id
                )));
            }

            if let Some(center) = record.fulfillment_center_id {
                if !batch.insert((record.product_id.as_str(), center)) {
                    return Err(DomainError::AlreadyExists(format!(
                        "Product {} has two inventory records in center {}",
                        record.product_id, center
                    )));
                }
            }
        }

        let wanted: Vec<FulfillmentCenterId> = records
            .iter()
            .filter_map(|r| r.fulfillment_center_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if wanted.is_empty() {
            return Ok(());
        }

        let known: HashSet<FulfillmentCenterId> = self
            .centers
            .find_by_ids(&wanted)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        if let Some(missing) = wanted.iter().find(|id| !known.contains(id)) {
            return Err(DomainError::Validation(format!(
                "Fulfillment center {} does not exist",
                missing
            )));
        }

        Ok(())
    }

    pub async fn delete_inventories(&self, ids: &[InventoryId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.inventories.delete(ids).await
    }

    /// Stock per product summed over all centers, in request order
    ///
    /// Products without records report zero stock.
    pub async fn get_product_availability(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<ProductAvailability>, DomainError> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = product_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let records = self.inventories.find_by_products(&unique).await?;
        Ok(unique
            .iter()
            .map(|id| ProductAvailability::from_records(id, &records))
            .collect())
    }
}
