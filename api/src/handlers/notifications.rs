//! Notification handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::IdsQuery;
use crate::domain::entities::{Notification, NotificationId, TenantIdentity};
use crate::error::AppError;
use crate::AppState;

/// Optional tenant for a per-tenant override
#[derive(Debug, Default, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: Option<String>,
    pub tenant_type: Option<String>,
}

impl TenantQuery {
    /// Both parts or neither
    pub fn tenant(&self) -> Result<Option<TenantIdentity>, AppError> {
        match (&self.tenant_id, &self.tenant_type) {
            (Some(id), Some(tenant_type)) => Ok(Some(TenantIdentity {
                id: id.clone(),
                tenant_type: tenant_type.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(AppError::BadRequest(
                "tenant_id and tenant_type must be given together".to_string(),
            )),
        }
    }
}

/// GET /api/notifications/types
pub async fn list_notification_types(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.notification_service.registered_types())
}

/// GET /api/notifications/:notification_type
pub async fn get_notification(
    State(state): State<AppState>,
    Path(notification_type): Path<String>,
    Query(query): Query<TenantQuery>,
) -> Result<Json<Notification>, AppError> {
    let tenant = query.tenant()?;
    let notification = state
        .notification_service
        .get_notification_by_type(&notification_type, tenant.as_ref())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Notification type {} is not registered",
                notification_type
            ))
        })?;

    Ok(Json(notification))
}

/// GET /api/notifications?ids=a,b
pub async fn get_notifications(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let ids: Vec<NotificationId> = query.parse()?;
    let notifications = state
        .notification_service
        .get_notifications_by_ids(&ids)
        .await?;
    Ok(Json(notifications))
}

/// PUT /api/notifications
pub async fn save_notifications(
    State(state): State<AppState>,
    Json(notifications): Json<Vec<Notification>>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let saved = state.notification_service.save_changes(&notifications).await?;
    Ok(Json(saved))
}
