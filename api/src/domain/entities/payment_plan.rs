//! Payment plan domain entity
//!
//! Billing interval definition used by subscriptions.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a payment plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentPlanId(pub Uuid);

impl PaymentPlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaymentPlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PaymentPlanId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PaymentPlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Billing interval unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentInterval {
    Days,
    Weeks,
    #[default]
    Months,
    Years,
}

impl std::fmt::Display for PaymentInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentInterval::Days => write!(f, "days"),
            PaymentInterval::Weeks => write!(f, "weeks"),
            PaymentInterval::Months => write!(f, "months"),
            PaymentInterval::Years => write!(f, "years"),
        }
    }
}

impl std::str::FromStr for PaymentInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "days" => Ok(PaymentInterval::Days),
            "weeks" => Ok(PaymentInterval::Weeks),
            "months" => Ok(PaymentInterval::Months),
            "years" => Ok(PaymentInterval::Years),
            _ => Err(format!("Unknown payment interval: {}", s)),
        }
    }
}

/// A subscription billing plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: PaymentPlanId,
    /// Billing interval unit
    pub interval: PaymentInterval,
    /// Units per billing period, e.g. every 5 months
    pub interval_count: i32,
    /// Trial length in days before the first period
    pub trial_period_days: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl PaymentPlan {
    /// End of the trial that starts at `start`
    pub fn trial_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + Duration::days(i64::from(self.trial_period_days.max(0)))
    }

    /// End of the billing period that starts at `start`
    ///
    /// Month and year arithmetic clamps to the last day of shorter months.
    /// Returns None when the result is out of range.
    pub fn period_end(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let count = u32::try_from(self.interval_count.max(1)).ok()?;
        match self.interval {
            PaymentInterval::Days => start.checked_add_signed(Duration::days(i64::from(count))),
            PaymentInterval::Weeks => start.checked_add_signed(Duration::weeks(i64::from(count))),
            PaymentInterval::Months => start.checked_add_months(Months::new(count)),
            PaymentInterval::Years => start.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }
}
