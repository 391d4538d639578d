//! Notification service
//!
//! Notification types are registered in code with their default channel and
//! templates. Stored definitions customise a registered type per tenant.

use std::sync::Arc;

use crate::domain::entities::{Notification, NotificationId, TenantIdentity};
use crate::domain::ports::NotificationRepository;
use crate::domain::type_registry::TypeRegistry;
use crate::error::DomainError;

/// Service for notification definitions
pub struct NotificationService<NR>
where
    NR: NotificationRepository,
{
    notifications: Arc<NR>,
    registry: TypeRegistry<Notification>,
}

impl<NR> NotificationService<NR>
where
    NR: NotificationRepository,
{
    pub fn new(notifications: Arc<NR>) -> Self {
        Self {
            notifications,
            registry: TypeRegistry::new(),
        }
    }

    /// Register a notification type. Returns false if the type was already registered.
    pub fn register_notification<F>(&self, notification_type: &str, constructor: F) -> bool
    where
        F: Fn() -> Notification + Send + Sync + 'static,
    {
        self.registry.register(notification_type, constructor)
    }

    pub fn registered_types(&self) -> Vec<String> {
        self.registry.type_names()
    }

    /// Registered default for a type, overlaid with its stored definition
    ///
    /// Returns None for unregistered types.
    pub async fn get_notification_by_type(
        &self,
        notification_type: &str,
        tenant: Option<&TenantIdentity>,
    ) -> Result<Option<Notification>, DomainError> {
        let Some(mut notification) = self.registry.try_create_instance(notification_type) else {
            tracing::debug!("Notification type {} is not registered", notification_type);
            return Ok(None);
        };

        if let Some(stored) = self
            .notifications
            .find_by_type(notification_type, tenant)
            .await?
        {
            notification.merge_stored(stored);
        } else {
            notification.tenant = tenant.cloned();
        }

        Ok(Some(notification))
    }

    pub async fn get_notifications_by_ids(
        &self,
        ids: &[NotificationId],
    ) -> Result<Vec<Notification>, DomainError> {
        self.notifications.find_by_ids(ids).await
    }

    /// Store customised definitions of registered types
    pub async fn save_changes(
        &self,
        notifications: &[Notification],
    ) -> Result<Vec<Notification>, DomainError> {
        for notification in notifications {
            let registered = self
                .registry
                .try_create_instance(&notification.notification_type)
                .ok_or_else(|| {
                    DomainError::Validation(format!(
                        "Notification type {} is not registered",
                        notification.notification_type
                    ))
                })?;

            if registered.kind.channel() != notification.kind.channel() {
                return Err(DomainError::Validation(format!(
                    "Notification type {} is sent by {}, not {}",
                    notification.notification_type,
                    registered.kind.channel(),
                    notification.kind.channel()
                )));
            }
        }

        let saved = self.notifications.save(notifications).await?;
        tracing::info!("Saved {} notifications", saved.len());
        Ok(saved)
    }
}
