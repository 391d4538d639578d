//! PostgreSQL adapter for FulfillmentCenterRepository

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::entities::{Address, FulfillmentCenter, FulfillmentCenterId};
use crate::domain::ports::FulfillmentCenterRepository;
use crate::entity::{fulfillment_centers, inventories};
use crate::error::DomainError;

/// PostgreSQL implementation of FulfillmentCenterRepository
pub struct PostgresFulfillmentCenterRepository {
    db: DatabaseConnection,
}

impl PostgresFulfillmentCenterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FulfillmentCenterRepository for PostgresFulfillmentCenterRepository {
    async fn find_by_ids(
        &self,
        ids: &[FulfillmentCenterId],
    ) -> Result<Vec<FulfillmentCenter>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = fulfillment_centers::Entity::find()
            .filter(fulfillment_centers::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn find_all(&self) -> Result<Vec<FulfillmentCenter>, DomainError> {
        let results = fulfillment_centers::Entity::find()
            .order_by_asc(fulfillment_centers::Column::Name)
            .order_by_asc(fulfillment_centers::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    async fn save(
        &self,
        centers: &[FulfillmentCenter],
    ) -> Result<Vec<FulfillmentCenter>, DomainError> {
        if centers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = centers.iter().map(|c| c.id.0).collect();
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing: HashSet<Uuid> = fulfillment_centers::Entity::find()
            .select_only()
            .column(fulfillment_centers::Column::Id)
            .filter(fulfillment_centers::Column::Id.is_in(ids))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();

        let mut saved = Vec::with_capacity(centers.len());
        for center in centers {
            let address = &center.address;
            let mut model = fulfillment_centers::ActiveModel {
                id: Set(center.id.0),
                name: Set(center.name.clone()),
                description: Set(center.description.clone()),
                line1: Set(address.line1.clone()),
                city: Set(address.city.clone()),
                postal_code: Set(address.postal_code.clone()),
                country_code: Set(address.country_code.clone()),
                phone: Set(address.phone.clone()),
                created_at: NotSet,
                modified_at: NotSet,
            };

            let result = if existing.contains(&center.id.0) {
                model.modified_at = Set(Some(now));
                model.update(&txn).await
            } else {
                model.created_at = Set(now);
                model.insert(&txn).await
            }
            .map_err(db_err)?;

            saved.push(result.into());
        }

        txn.commit().await.map_err(db_err)?;

        Ok(saved)
    }

    async fn delete(&self, ids: &[FulfillmentCenterId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let txn = self.db.begin().await.map_err(db_err)?;

        // Stock outlives its center, as with ON DELETE SET NULL
        inventories::Entity::update_many()
            .col_expr(
                inventories::Column::FulfillmentCenterId,
                Expr::value(Option::<Uuid>::None),
            )
            .filter(inventories::Column::FulfillmentCenterId.is_in(uuids.clone()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = fulfillment_centers::Entity::delete_many()
            .filter(fulfillment_centers::Column::Id.is_in(uuids))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

/// Convert SeaORM model to domain entity
impl From<fulfillment_centers::Model> for FulfillmentCenter {
    fn from(model: fulfillment_centers::Model) -> Self {
        FulfillmentCenter {
            id: FulfillmentCenterId(model.id),
            name: model.name,
            description: model.description,
            address: Address {
                line1: model.line1,
                city: model.city,
                postal_code: model.postal_code,
                country_code: model.country_code,
                phone: model.phone,
            },
            created_at: model.created_at.with_timezone(&Utc),
            modified_at: model.modified_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
