//! Dynamic property handlers
//!
//! Endpoints for object types, property definitions, dictionary items,
//! per-object values and the cached searches over them.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{DeleteResponse, IdsQuery};
use crate::domain::entities::{
    DictionaryItem, DictionaryItemId, DictionaryItemSearchCriteria, DynamicProperty,
    DynamicPropertyId, DynamicPropertyObjectValue, DynamicPropertySearchCriteria,
    DynamicPropertyValueType, LocalizedName, SearchResult,
};
use crate::error::AppError;
use crate::AppState;

/// Request to register object types
#[derive(Debug, Deserialize)]
pub struct RegisterTypesRequest {
    pub types: Vec<String>,
}

/// A property to create (no id) or update
#[derive(Debug, Deserialize)]
pub struct PropertyInput {
    pub id: Option<DynamicPropertyId>,
    pub object_type: String,
    pub name: String,
    pub description: Option<String>,
    pub value_type: DynamicPropertyValueType,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub is_required: bool,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub display_names: Vec<LocalizedName>,
}

impl From<PropertyInput> for DynamicProperty {
    fn from(input: PropertyInput) -> Self {
        DynamicProperty {
            id: input.id.unwrap_or_default(),
            object_type: input.object_type,
            name: input.name,
            description: input.description,
            value_type: input.value_type,
            is_array: input.is_array,
            is_required: input.is_required,
            display_order: input.display_order,
            display_names: input.display_names,
            dictionary_item_ids: Vec::new(),
            created_at: Utc::now(),
            modified_at: None,
        }
    }
}

/// A dictionary item to create (no id) or update
#[derive(Debug, Deserialize)]
pub struct DictionaryItemInput {
    pub id: Option<DictionaryItemId>,
    pub property_id: DynamicPropertyId,
    pub name: String,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub display_names: Vec<LocalizedName>,
}

impl From<DictionaryItemInput> for DictionaryItem {
    fn from(input: DictionaryItemInput) -> Self {
        DictionaryItem {
            id: input.id.unwrap_or_default(),
            property_id: input.property_id,
            name: input.name,
            sort_order: input.sort_order,
            display_names: input.display_names,
        }
    }
}

/// One value of an object; the object comes from the path
#[derive(Debug, Deserialize)]
pub struct ObjectValueInput {
    pub property_id: DynamicPropertyId,
    pub locale: Option<String>,
    pub value: Option<serde_json::Value>,
    pub dictionary_item_id: Option<DictionaryItemId>,
}

/// GET /api/platform/dynamic/types
pub async fn list_types(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.dynamic_property_service.registered_types())
}

/// POST /api/platform/dynamic/types
///
/// Register object types. Already registered types are ignored.
pub async fn register_types(
    State(state): State<AppState>,
    Json(request): Json<RegisterTypesRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    if request.types.iter().any(|t| t.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "Object type names must not be empty".to_string(),
        ));
    }

    for object_type in &request.types {
        state.dynamic_property_service.register_type(object_type);
    }

    Ok(Json(state.dynamic_property_service.registered_types()))
}

/// POST /api/platform/dynamic/properties/search
///
/// The search is cancelled if the client goes away.
pub async fn search_properties(
    State(state): State<AppState>,
    Json(criteria): Json<DynamicPropertySearchCriteria>,
) -> Result<Json<SearchResult<DynamicProperty>>, AppError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result = state
        .search_service
        .search_dynamic_properties(&criteria, &cancel)
        .await?;

    Ok(Json(result))
}

/// GET /api/platform/dynamic/properties?ids=a,b
pub async fn get_properties(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<DynamicProperty>>, AppError> {
    let ids: Vec<DynamicPropertyId> = query.parse()?;
    let properties = state
        .dynamic_property_service
        .get_dynamic_properties(&ids)
        .await?;
    Ok(Json(properties))
}

/// PUT /api/platform/dynamic/properties
pub async fn save_properties(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<PropertyInput>>,
) -> Result<Json<Vec<DynamicProperty>>, AppError> {
    let properties: Vec<DynamicProperty> = inputs.into_iter().map(Into::into).collect();
    let saved = state
        .dynamic_property_service
        .save_dynamic_properties(&properties)
        .await?;
    Ok(Json(saved))
}

/// DELETE /api/platform/dynamic/properties?ids=a,b
pub async fn delete_properties(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let ids: Vec<DynamicPropertyId> = query.parse()?;
    let deleted = state
        .dynamic_property_service
        .delete_dynamic_properties(&ids)
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// POST /api/platform/dynamic/dictionaryitems/search
pub async fn search_dictionary_items(
    State(state): State<AppState>,
    Json(criteria): Json<DictionaryItemSearchCriteria>,
) -> Result<Json<SearchResult<DictionaryItem>>, AppError> {
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result = state
        .search_service
        .search_dictionary_items(&criteria, &cancel)
        .await?;

    Ok(Json(result))
}

/// GET /api/platform/dynamic/dictionaryitems?ids=a,b
pub async fn get_dictionary_items(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<DictionaryItem>>, AppError> {
    let ids: Vec<DictionaryItemId> = query.parse()?;
    let items = state
        .dictionary_item_service
        .get_dictionary_items(&ids)
        .await?;
    Ok(Json(items))
}

/// PUT /api/platform/dynamic/dictionaryitems
pub async fn save_dictionary_items(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<DictionaryItemInput>>,
) -> Result<Json<Vec<DictionaryItem>>, AppError> {
    let items: Vec<DictionaryItem> = inputs.into_iter().map(Into::into).collect();
    let saved = state
        .dictionary_item_service
        .save_dictionary_items(&items)
        .await?;
    Ok(Json(saved))
}

/// DELETE /api/platform/dynamic/dictionaryitems?ids=a,b
pub async fn delete_dictionary_items(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let ids: Vec<DictionaryItemId> = query.parse()?;
    let deleted = state
        .dictionary_item_service
        .delete_dictionary_items(&ids)
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// GET /api/platform/dynamic/values/:object_type/:object_id
pub async fn get_object_values(
    State(state): State<AppState>,
    Path((object_type, object_id)): Path<(String, String)>,
) -> Result<Json<Vec<DynamicPropertyObjectValue>>, AppError> {
    let values = state
        .dynamic_property_service
        .get_object_values(&object_type, &object_id)
        .await?;
    Ok(Json(values))
}

/// PUT /api/platform/dynamic/values/:object_type/:object_id
///
/// Replaces every value of the object with the request body.
pub async fn save_object_values(
    State(state): State<AppState>,
    Path((object_type, object_id)): Path<(String, String)>,
    Json(inputs): Json<Vec<ObjectValueInput>>,
) -> Result<Json<Vec<DynamicPropertyObjectValue>>, AppError> {
    let values: Vec<DynamicPropertyObjectValue> = inputs
        .into_iter()
        .map(|v| DynamicPropertyObjectValue {
            object_type: object_type.clone(),
            object_id: object_id.clone(),
            property_id: v.property_id,
            locale: v.locale,
            value: v.value,
            dictionary_item_id: v.dictionary_item_id,
        })
        .collect();

    state
        .dynamic_property_service
        .save_object_values(&object_type, &object_id, &values)
        .await?;

    let stored = state
        .dynamic_property_service
        .get_object_values(&object_type, &object_id)
        .await?;
    Ok(Json(stored))
}
