//! PostgreSQL adapter for DynamicPropertyRepository

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{contains_literal, db_err, names_from_json, names_to_json, sea_order};
use crate::domain::entities::{
    DictionaryItem, DictionaryItemId, DynamicProperty, DynamicPropertyId,
    DynamicPropertyObjectValue, DynamicPropertyValueType, IdPage, PropertyQuery,
    PropertySortColumn,
};
use crate::domain::ports::DynamicPropertyRepository;
use crate::entity::{
    dynamic_properties, dynamic_property_dictionary_items, dynamic_property_object_values,
};
use crate::error::DomainError;

/// PostgreSQL implementation of DynamicPropertyRepository
pub struct PostgresDynamicPropertyRepository {
    db: DatabaseConnection,
}

impl PostgresDynamicPropertyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(column: PropertySortColumn) -> dynamic_properties::Column {
    match column {
        PropertySortColumn::Name => dynamic_properties::Column::Name,
        PropertySortColumn::ObjectType => dynamic_properties::Column::ObjectType,
        PropertySortColumn::ValueType => dynamic_properties::Column::ValueType,
        PropertySortColumn::DisplayOrder => dynamic_properties::Column::DisplayOrder,
        PropertySortColumn::CreatedAt => dynamic_properties::Column::CreatedAt,
        PropertySortColumn::ModifiedAt => dynamic_properties::Column::ModifiedAt,
    }
}

/// Dictionary item ids per property, in list order
async fn item_ids_by_property<C: ConnectionTrait>(
    conn: &C,
    property_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<DictionaryItemId>>, DomainError> {
    let models = dynamic_property_dictionary_items::Entity::find()
        .filter(dynamic_property_dictionary_items::Column::PropertyId.is_in(property_ids))
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut grouped: HashMap<Uuid, Vec<DictionaryItem>> = HashMap::new();
    for model in models {
        grouped
            .entry(model.property_id)
            .or_default()
            .push(DictionaryItem::try_from(model)?);
    }

    Ok(grouped
        .into_iter()
        .map(|(property_id, mut items)| {
            items.sort_by(DictionaryItem::list_order);
            (property_id, items.into_iter().map(|i| i.id).collect())
        })
        .collect())
}

fn into_domain(
    model: dynamic_properties::Model,
    dictionary_item_ids: Vec<DictionaryItemId>,
) -> Result<DynamicProperty, DomainError> {
    let value_type = model
        .value_type
        .parse::<DynamicPropertyValueType>()
        .map_err(|e| DomainError::Internal(format!("Dynamic property {}: {}", model.id, e)))?;

    Ok(DynamicProperty {
        id: DynamicPropertyId(model.id),
        object_type: model.object_type,
        name: model.name,
        description: model.description,
        value_type,
        is_array: model.is_array,
        is_required: model.is_required,
        display_order: model.display_order,
        display_names: names_from_json(model.display_names)?,
        dictionary_item_ids,
        created_at: model.created_at.with_timezone(&Utc),
        modified_at: model.modified_at.map(|dt| dt.with_timezone(&Utc)),
    })
}

fn active_model(
    property: &DynamicProperty,
) -> Result<dynamic_properties::ActiveModel, DomainError> {
    Ok(dynamic_properties::ActiveModel {
        id: Set(property.id.0),
        object_type: Set(property.object_type.clone()),
        name: Set(property.name.clone()),
        description: Set(property.description.clone()),
        value_type: Set(property.value_type.to_string()),
        is_array: Set(property.is_array),
        is_required: Set(property.is_required),
        display_order: Set(property.display_order),
        display_names: Set(names_to_json(&property.display_names)?),
        created_at: NotSet,
        modified_at: NotSet,
    })
}

#[async_trait]
impl DynamicPropertyRepository for PostgresDynamicPropertyRepository {
    async fn find_by_ids(
        &self,
        ids: &[DynamicPropertyId],
    ) -> Result<Vec<DynamicProperty>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let models = dynamic_properties::Entity::find()
            .filter(dynamic_properties::Column::Id.is_in(uuids.clone()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut item_ids = item_ids_by_property(&self.db, uuids).await?;

        models
            .into_iter()
            .map(|m| {
                let items = item_ids.remove(&m.id).unwrap_or_default();
                into_domain(m, items)
            })
            .collect()
    }

    async fn find_by_name(
        &self,
        object_type: &str,
        name: &str,
    ) -> Result<Option<DynamicProperty>, DomainError> {
        let model = dynamic_properties::Entity::find()
            .filter(dynamic_properties::Column::ObjectType.eq(object_type))
            .filter(dynamic_properties::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(m) => {
                let items = item_ids_by_property(&self.db, vec![m.id])
                    .await?
                    .remove(&m.id)
                    .unwrap_or_default();
                Ok(Some(into_domain(m, items)?))
            }
            None => Ok(None),
        }
    }

    async fn search_ids(
        &self,
        query: &PropertyQuery,
    ) -> Result<IdPage<DynamicPropertyId>, DomainError> {
        // Count and page read from one transaction so they agree
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut select = dynamic_properties::Entity::find();
        if let Some(object_type) = &query.object_type {
            select =
                select.filter(dynamic_properties::Column::ObjectType.eq(object_type.as_str()));
        }
        if !query.object_types.is_empty() {
            select = select
                .filter(dynamic_properties::Column::ObjectType.is_in(query.object_types.clone()));
        }
        if let Some(keyword) = &query.keyword {
            select =
                select.filter(contains_literal(dynamic_properties::Column::Name, keyword));
        }

        let total_count = select.clone().count(&txn).await.map_err(db_err)?;

        for order in &query.order {
            select = select.order_by(sort_column(order.column), sea_order(order.direction));
        }

        let ids: Vec<Uuid> = select
            .order_by_asc(dynamic_properties::Column::Id)
            .select_only()
            .column(dynamic_properties::Column::Id)
            .offset(query.skip)
            .limit(query.take)
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(IdPage {
            total_count,
            ids: ids.into_iter().map(DynamicPropertyId).collect(),
        })
    }

    async fn save(
        &self,
        properties: &[DynamicProperty],
    ) -> Result<Vec<DynamicProperty>, DomainError> {
        if properties.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = properties.iter().map(|p| p.id.0).collect();
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing: HashSet<Uuid> = dynamic_properties::Entity::find()
            .select_only()
            .column(dynamic_properties::Column::Id)
            .filter(dynamic_properties::Column::Id.is_in(ids.clone()))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();

        for property in properties {
            let mut model = active_model(property)?;
            if existing.contains(&property.id.0) {
                model.modified_at = Set(Some(now));
                model.update(&txn).await.map_err(db_err)?;
            } else {
                model.created_at = Set(now);
                model.insert(&txn).await.map_err(db_err)?;
            }
        }

        txn.commit().await.map_err(db_err)?;

        let ids: Vec<DynamicPropertyId> = ids.into_iter().map(DynamicPropertyId).collect();
        self.find_by_ids(&ids).await
    }

    async fn delete(&self, ids: &[DynamicPropertyId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let txn = self.db.begin().await.map_err(db_err)?;

        dynamic_property_dictionary_items::Entity::delete_many()
            .filter(dynamic_property_dictionary_items::Column::PropertyId.is_in(uuids.clone()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = dynamic_properties::Entity::delete_many()
            .filter(dynamic_properties::Column::Id.is_in(uuids))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn find_object_values(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<Vec<DynamicPropertyObjectValue>, DomainError> {
        let models = dynamic_property_object_values::Entity::find()
            .filter(dynamic_property_object_values::Column::ObjectType.eq(object_type))
            .filter(dynamic_property_object_values::Column::ObjectId.eq(object_id))
            .order_by_asc(dynamic_property_object_values::Column::PropertyId)
            .order_by_asc(dynamic_property_object_values::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn replace_object_values(
        &self,
        object_type: &str,
        object_id: &str,
        values: &[DynamicPropertyObjectValue],
    ) -> Result<(), DomainError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        dynamic_property_object_values::Entity::delete_many()
            .filter(dynamic_property_object_values::Column::ObjectType.eq(object_type))
            .filter(dynamic_property_object_values::Column::ObjectId.eq(object_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if !values.is_empty() {
            let models = values.iter().map(|v| dynamic_property_object_values::ActiveModel {
                id: Set(Uuid::new_v4()),
                object_type: Set(object_type.to_string()),
                object_id: Set(object_id.to_string()),
                property_id: Set(v.property_id.0),
                locale: Set(v.locale.clone()),
                value: Set(v.value.clone()),
                dictionary_item_id: Set(v.dictionary_item_id.map(|id| id.0)),
                created_at: Set(now),
            });

            dynamic_property_object_values::Entity::insert_many(models)
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<dynamic_property_object_values::Model> for DynamicPropertyObjectValue {
    fn from(model: dynamic_property_object_values::Model) -> Self {
        DynamicPropertyObjectValue {
            object_type: model.object_type,
            object_id: model.object_id,
            property_id: DynamicPropertyId(model.property_id),
            locale: model.locale,
            value: model.value,
            dictionary_item_id: model.dictionary_item_id.map(DictionaryItemId),
        }
    }
}
