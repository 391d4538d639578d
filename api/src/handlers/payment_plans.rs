//! Payment plan handlers

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeleteResponse, IdsQuery};
use crate::domain::entities::{PaymentInterval, PaymentPlan, PaymentPlanId};
use crate::error::AppError;
use crate::AppState;

/// A plan to create (no id) or update
#[derive(Debug, Deserialize)]
pub struct PaymentPlanInput {
    pub id: Option<PaymentPlanId>,
    #[serde(default)]
    pub interval: PaymentInterval,
    #[serde(default = "default_interval_count")]
    pub interval_count: i32,
    #[serde(default)]
    pub trial_period_days: i32,
}

fn default_interval_count() -> i32 {
    1
}

impl From<PaymentPlanInput> for PaymentPlan {
    fn from(input: PaymentPlanInput) -> Self {
        PaymentPlan {
            id: input.id.unwrap_or_default(),
            interval: input.interval,
            interval_count: input.interval_count,
            trial_period_days: input.trial_period_days,
            created_at: Utc::now(),
            created_by: None,
            modified_at: None,
            modified_by: None,
        }
    }
}

/// Plan with its schedule for a subscription starting now
#[derive(Debug, Serialize)]
pub struct PaymentPlanResponse {
    #[serde(flatten)]
    pub plan: PaymentPlan,
    pub trial_end: DateTime<Utc>,
    pub period_end: Option<DateTime<Utc>>,
}

impl PaymentPlanResponse {
    fn starting_at(plan: PaymentPlan, start: DateTime<Utc>) -> Self {
        Self {
            trial_end: plan.trial_end(start),
            period_end: plan.period_end(start),
            plan,
        }
    }
}

/// GET /api/subscriptions/plans?ids=a,b
pub async fn get_plans(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<Vec<PaymentPlanResponse>>, AppError> {
    let ids: Vec<PaymentPlanId> = query.parse()?;
    let plans = state.payment_plan_service.get_plans_by_ids(&ids).await?;

    let now = Utc::now();
    Ok(Json(
        plans
            .into_iter()
            .map(|p| PaymentPlanResponse::starting_at(p, now))
            .collect(),
    ))
}

/// PUT /api/subscriptions/plans
pub async fn save_plans(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<PaymentPlanInput>>,
) -> Result<Json<Vec<PaymentPlan>>, AppError> {
    let plans: Vec<PaymentPlan> = inputs.into_iter().map(Into::into).collect();
    let saved = state.payment_plan_service.save_plans(&plans).await?;
    Ok(Json(saved))
}

/// DELETE /api/subscriptions/plans?ids=a,b
pub async fn delete_plans(
    State(state): State<AppState>,
    Query(query): Query<IdsQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let ids: Vec<PaymentPlanId> = query.parse()?;
    let deleted = state.payment_plan_service.delete_plans(&ids).await?;
    Ok(Json(DeleteResponse { deleted }))
}
