//! PostgreSQL adapter for InventoryRepository

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::entities::{FulfillmentCenterId, InventoryId, InventoryInfo, InventoryStatus};
use crate::domain::ports::InventoryRepository;
use crate::entity::inventories;
use crate::error::DomainError;

/// PostgreSQL implementation of InventoryRepository
pub struct PostgresInventoryRepository {
    db: DatabaseConnection,
}

impl PostgresInventoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(record: &InventoryInfo) -> inventories::ActiveModel {
    inventories::ActiveModel {
        id: Set(record.id.0),
        product_id: Set(record.product_id.clone()),
        fulfillment_center_id: Set(record.fulfillment_center_id.map(|id| id.0)),
        status: Set(record.status.to_string()),
        in_stock_quantity: Set(record.in_stock_quantity),
        reserved_quantity: Set(record.reserved_quantity),
        reorder_min_quantity: Set(record.reorder_min_quantity),
        allow_backorder: Set(record.allow_backorder),
        backorder_quantity: Set(record.backorder_quantity),
        backorder_available_date: Set(record.backorder_available_date.map(|d| d.fixed_offset())),
        allow_preorder: Set(record.allow_preorder),
        preorder_quantity: Set(record.preorder_quantity),
        preorder_available_date: Set(record.preorder_available_date.map(|d| d.fixed_offset())),
        created_at: NotSet,
        modified_at: NotSet,
    }
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    async fn find_by_ids(&self, ids: &[InventoryId]) -> Result<Vec<InventoryInfo>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = inventories::Entity::find()
            .filter(inventories::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(InventoryInfo::try_from).collect()
    }

    async fn find_by_products(
        &self,
        product_ids: &[String],
    ) -> Result<Vec<InventoryInfo>, DomainError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = inventories::Entity::find()
            .filter(inventories::Column::ProductId.is_in(product_ids.iter().cloned()))
            .order_by_asc(inventories::Column::ProductId)
            .order_by_asc(inventories::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(InventoryInfo::try_from).collect()
    }

    async fn save(&self, records: &[InventoryInfo]) -> Result<Vec<InventoryInfo>, DomainError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = records.iter().map(|r| r.id.0).collect();
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing: HashSet<Uuid> = inventories::Entity::find()
            .select_only()
            .column(inventories::Column::Id)
            .filter(inventories::Column::Id.is_in(ids))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();

        let mut saved = Vec::with_capacity(records.len());
        for record in records {
            let mut model = active_model(record);
            let result = if existing.contains(&record.id.0) {
                model.modified_at = Set(Some(now));
                model.update(&txn).await
            } else {
                model.created_at = Set(now);
                model.insert(&txn).await
            }
            .map_err(db_err)?;

            saved.push(InventoryInfo::try_from(result)?);
        }

        txn.commit().await.map_err(db_err)?;

        Ok(saved)
    }

    async fn delete(&self, ids: &[InventoryId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = inventories::Entity::delete_many()
            .filter(inventories::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<inventories::Model> for InventoryInfo {
    type Error = DomainError;

    fn try_from(model: inventories::Model) -> Result<Self, Self::Error> {
        let status: InventoryStatus = model
            .status
            .parse()
            .map_err(|e| DomainError::Internal(format!("Inventory {}: {}", model.id, e)))?;

        Ok(InventoryInfo {
            id: InventoryId(model.id),
            product_id: model.product_id,
            fulfillment_center_id: model.fulfillment_center_id.map(FulfillmentCenterId),
            status,
            in_stock_quantity: model.in_stock_quantity,
            reserved_quantity: model.reserved_quantity,
            reorder_min_quantity: model.reorder_min_quantity,
            allow_backorder: model.allow_backorder,
            backorder_quantity: model.backorder_quantity,
            backorder_available_date: model
                .backorder_available_date
                .map(|dt| dt.with_timezone(&Utc)),
            allow_preorder: model.allow_preorder,
            preorder_quantity: model.preorder_quantity,
            preorder_available_date: model
                .preorder_available_date
                .map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            modified_at: model.modified_at.map(|dt| dt.with_timezone(&Utc)),
        })
    }
}
