//! PostgreSQL adapter for DictionaryItemRepository

use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{contains_literal, db_err, names_from_json, names_to_json, sea_order};
use crate::domain::entities::{
    DictionaryItem, DictionaryItemId, DictionaryItemQuery, DictionaryItemSortColumn,
    DynamicPropertyId, IdPage,
};
use crate::domain::ports::DictionaryItemRepository;
use crate::entity::dynamic_property_dictionary_items as items;
use crate::error::DomainError;

/// PostgreSQL implementation of DictionaryItemRepository
pub struct PostgresDictionaryItemRepository {
    db: DatabaseConnection,
}

impl PostgresDictionaryItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(column: DictionaryItemSortColumn) -> items::Column {
    match column {
        DictionaryItemSortColumn::Name => items::Column::Name,
        DictionaryItemSortColumn::SortOrder => items::Column::SortOrder,
    }
}

#[async_trait]
impl DictionaryItemRepository for PostgresDictionaryItemRepository {
    async fn find_by_ids(
        &self,
        ids: &[DictionaryItemId],
    ) -> Result<Vec<DictionaryItem>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = items::Entity::find()
            .filter(items::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(DictionaryItem::try_from).collect()
    }

    async fn find_by_property(
        &self,
        property_id: &DynamicPropertyId,
    ) -> Result<Vec<DictionaryItem>, DomainError> {
        let results = items::Entity::find()
            .filter(items::Column::PropertyId.eq(property_id.0))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut items = results
            .into_iter()
            .map(DictionaryItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        items.sort_by(DictionaryItem::list_order);
        Ok(items)
    }

    async fn search_ids(
        &self,
        query: &DictionaryItemQuery,
    ) -> Result<IdPage<DictionaryItemId>, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut select = items::Entity::find();
        if let Some(property_id) = &query.property_id {
            select = select.filter(items::Column::PropertyId.eq(property_id.0));
        }
        if let Some(keyword) = &query.keyword {
            select = select.filter(contains_literal(items::Column::Name, keyword));
        }

        let total_count = select.clone().count(&txn).await.map_err(db_err)?;

        for order in &query.order {
            select = select.order_by(sort_column(order.column), sea_order(order.direction));
        }

        let ids: Vec<Uuid> = select
            .order_by_asc(items::Column::Id)
            .select_only()
            .column(items::Column::Id)
            .offset(query.skip)
            .limit(query.take)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(IdPage {
            total_count,
            ids: ids.into_iter().map(DictionaryItemId).collect(),
        })
    }

    async fn save(&self, to_save: &[DictionaryItem]) -> Result<Vec<DictionaryItem>, DomainError> {
        if to_save.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = to_save.iter().map(|i| i.id.0).collect();
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing: HashSet<Uuid> = items::Entity::find()
            .select_only()
            .column(items::Column::Id)
            .filter(items::Column::Id.is_in(ids))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();

        let mut saved = Vec::with_capacity(to_save.len());
        for item in to_save {
            let model = items::ActiveModel {
                id: Set(item.id.0),
                property_id: Set(item.property_id.0),
                name: Set(item.name.clone()),
                sort_order: Set(item.sort_order),
                display_names: Set(names_to_json(&item.display_names)?),
            };

            let result = if existing.contains(&item.id.0) {
                model.update(&txn).await
            } else {
                model.insert(&txn).await
            }
            .map_err(db_err)?;

            saved.push(DictionaryItem::try_from(result)?);
        }

        txn.commit().await.map_err(db_err)?;

        Ok(saved)
    }

    async fn delete(&self, ids: &[DictionaryItemId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = items::Entity::delete_many()
            .filter(items::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<items::Model> for DictionaryItem {
    type Error = DomainError;

    fn try_from(model: items::Model) -> Result<Self, Self::Error> {
        Ok(DictionaryItem {
            id: DictionaryItemId(model.id),
            property_id: DynamicPropertyId(model.property_id),
            name: model.name,
            sort_order: model.sort_order,
            display_names: names_from_json(model.display_names)?,
        })
    }
}
