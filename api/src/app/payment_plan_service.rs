//! Payment plan service
//!
//! Handles CRUD for subscription payment plans.

use std::sync::Arc;

use crate::domain::entities::{PaymentPlan, PaymentPlanId};
use crate::domain::ports::PaymentPlanRepository;
use crate::error::DomainError;

/// Service for payment plans
pub struct PaymentPlanService<PPR>
where
    PPR: PaymentPlanRepository,
{
    plans: Arc<PPR>,
}

impl<PPR> PaymentPlanService<PPR>
where
    PPR: PaymentPlanRepository,
{
    pub fn new(plans: Arc<PPR>) -> Self {
        Self { plans }
    }

    pub async fn get_plans_by_ids(
        &self,
        ids: &[PaymentPlanId],
    ) -> Result<Vec<PaymentPlan>, DomainError> {
        self.plans.find_by_ids(ids).await
    }

    /// Insert new plans and update existing ones
    pub async fn save_plans(&self, plans: &[PaymentPlan]) -> Result<Vec<PaymentPlan>, DomainError> {
        for plan in plans {
            if plan.interval_count < 1 {
                return Err(DomainError::Validation(format!(
                    "Payment plan {} needs an interval count of at least 1",
                    plan.id
                )));
            }
            if plan.trial_period_days < 0 {
                return Err(DomainError::Validation(format!(
                    "Payment plan {} has a negative trial period",
                    plan.id
                )));
            }
        }

        let saved = self.plans.save(plans).await?;
        tracing::info!("Saved {} payment plans", saved.len());
        Ok(saved)
    }

    pub async fn delete_plans(&self, ids: &[PaymentPlanId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.plans.delete(ids).await
    }
}
