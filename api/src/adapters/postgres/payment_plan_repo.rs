//! PostgreSQL adapter for PaymentPlanRepository

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::db_err;
use crate::domain::entities::{PaymentInterval, PaymentPlan, PaymentPlanId};
use crate::domain::ports::PaymentPlanRepository;
use crate::entity::payment_plans;
use crate::error::DomainError;

/// PostgreSQL implementation of PaymentPlanRepository
pub struct PostgresPaymentPlanRepository {
    db: DatabaseConnection,
}

impl PostgresPaymentPlanRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentPlanRepository for PostgresPaymentPlanRepository {
    async fn find_by_ids(&self, ids: &[PaymentPlanId]) -> Result<Vec<PaymentPlan>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = payment_plans::Entity::find()
            .filter(payment_plans::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        results.into_iter().map(PaymentPlan::try_from).collect()
    }

    async fn save(&self, plans: &[PaymentPlan]) -> Result<Vec<PaymentPlan>, DomainError> {
        if plans.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = plans.iter().map(|p| p.id.0).collect();
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing: HashSet<Uuid> = payment_plans::Entity::find()
            .select_only()
            .column(payment_plans::Column::Id)
            .filter(payment_plans::Column::Id.is_in(ids))
            .into_tuple::<Uuid>()
            .all(&txn)
            .await
            .map_err(db_err)?
            .into_iter()
            .collect();

        let mut saved = Vec::with_capacity(plans.len());
        for plan in plans {
            let mut model = payment_plans::ActiveModel {
                id: Set(plan.id.0),
                interval: Set(plan.interval.to_string()),
                interval_count: Set(plan.interval_count),
                trial_period_days: Set(plan.trial_period_days),
                created_at: NotSet,
                created_by: NotSet,
                modified_at: NotSet,
                modified_by: NotSet,
            };

            let result = if existing.contains(&plan.id.0) {
                model.modified_at = Set(Some(now));
                model.modified_by = Set(plan.modified_by.clone());
                model.update(&txn).await
            } else {
                model.created_at = Set(now);
                model.created_by = Set(plan.created_by.clone());
                model.insert(&txn).await
            }
            .map_err(db_err)?;

            saved.push(PaymentPlan::try_from(result)?);
        }

        txn.commit().await.map_err(db_err)?;

        Ok(saved)
    }

    async fn delete(&self, ids: &[PaymentPlanId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = payment_plans::Entity::delete_many()
            .filter(payment_plans::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

/// Convert SeaORM model to domain entity
impl TryFrom<payment_plans::Model> for PaymentPlan {
    type Error = DomainError;

    fn try_from(model: payment_plans::Model) -> Result<Self, Self::Error> {
        let interval: PaymentInterval = model
            .interval
            .parse()
            .map_err(|e| DomainError::Internal(format!("Payment plan {}: {}", model.id, e)))?;

        Ok(PaymentPlan {
            id: PaymentPlanId(model.id),
            interval,
            interval_count: model.interval_count,
            trial_period_days: model.trial_period_days,
            created_at: model.created_at.with_timezone(&Utc),
            created_by: model.created_by,
            modified_at: model.modified_at.map(|dt| dt.with_timezone(&Utc)),
            modified_by: model.modified_by,
        })
    }
}
