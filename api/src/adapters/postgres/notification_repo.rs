//! PostgreSQL adapter for NotificationRepository

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::entities::{
    Notification, NotificationId, NotificationKind, NotificationTemplate, TenantIdentity,
};
use crate::domain::ports::NotificationRepository;
use crate::entity::notifications;
use crate::error::DomainError;

/// PostgreSQL implementation of NotificationRepository
pub struct PostgresNotificationRepository {
    db: DatabaseConnection,
}

impl PostgresNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_domain(model: notifications::Model) -> Result<Notification, DomainError> {
    let kind: NotificationKind = serde_json::from_value(model.kind).map_err(|e| {
        DomainError::Internal(format!("Notification {} has invalid kind: {}", model.id, e))
    })?;
    let templates: Vec<NotificationTemplate> =
        serde_json::from_value(model.templates).map_err(|e| {
            DomainError::Internal(format!(
                "Notification {} has invalid templates: {}",
                model.id, e
            ))
        })?;

    let tenant = match (model.tenant_id, model.tenant_type) {
        (Some(id), Some(tenant_type)) => Some(TenantIdentity { id, tenant_type }),
        _ => None,
    };

    Ok(Notification {
        id: Some(NotificationId(model.id)),
        notification_type: model.notification_type,
        kind,
        is_active: model.is_active,
        tenant,
        templates,
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::Internal(format!("Failed to encode notification: {}", e)))
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn find_by_type(
        &self,
        notification_type: &str,
        tenant: Option<&TenantIdentity>,
    ) -> Result<Option<Notification>, DomainError> {
        let mut select = notifications::Entity::find()
            .filter(notifications::Column::NotificationType.eq(notification_type));

        select = match tenant {
            Some(t) => select
                .filter(notifications::Column::TenantId.eq(t.id.as_str()))
                .filter(notifications::Column::TenantType.eq(t.tenant_type.as_str())),
            None => select.filter(notifications::Column::TenantId.is_null()),
        };

        let result = select.one(&self.db).await.map_err(db_err)?;

        result.map(into_domain).transpose()
    }

    async fn find_by_ids(&self, ids: &[NotificationId]) -> Result<Vec<Notification>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = notifications::Entity::find()
            .filter(notifications::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(into_domain).collect()
    }

    async fn save(
        &self,
        to_save: &[Notification],
    ) -> Result<Vec<Notification>, DomainError> {
        if to_save.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        let known_ids: Vec<Uuid> = to_save.iter().filter_map(|n| n.id.map(|id| id.0)).collect();
        let existing: HashSet<Uuid> = if known_ids.is_empty() {
            HashSet::new()
        } else {
            notifications::Entity::find()
                .select_only()
                .column(notifications::Column::Id)
                .filter(notifications::Column::Id.is_in(known_ids))
                .into_tuple::<Uuid>()
                .all(&txn)
                .await
                .map_err(db_err)?
                .into_iter()
                .collect()
        };

        let mut saved = Vec::with_capacity(to_save.len());
        for notification in to_save {
            let id = notification.id.map(|id| id.0).unwrap_or_else(Uuid::new_v4);
            let mut model = notifications::ActiveModel {
                id: Set(id),
                notification_type: Set(notification.notification_type.clone()),
                kind: Set(encode(&notification.kind)?),
                is_active: Set(notification.is_active),
                tenant_id: Set(notification.tenant.as_ref().map(|t| t.id.clone())),
                tenant_type: Set(notification.tenant.as_ref().map(|t| t.tenant_type.clone())),
                templates: Set(encode(&notification.templates)?),
                created_at: NotSet,
                modified_at: NotSet,
            };

            let result = if existing.contains(&id) {
                model.modified_at = Set(Some(now));
                model.update(&txn).await
            } else {
                model.created_at = Set(now);
                model.insert(&txn).await
            }
            .map_err(db_err)?;

            saved.push(into_domain(result)?);
        }

        txn.commit().await.map_err(db_err)?;

        Ok(saved)
    }
}
