//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod dictionary_item_repo;
pub mod dynamic_property_repo;
pub mod fulfillment_center_repo;
pub mod inventory_repo;
pub mod notification_repo;
pub mod payment_plan_repo;


pub use dictionary_item_repo::PostgresDictionaryItemRepository;
pub use dynamic_property_repo::PostgresDynamicPropertyRepository;
pub use fulfillment_center_repo::PostgresFulfillmentCenterRepository;
pub use inventory_repo::PostgresInventoryRepository;
pub use notification_repo::PostgresNotificationRepository;
pub use payment_plan_repo::PostgresPaymentPlanRepository;

use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{DbErr, Order, SqlErr};

use crate::domain::entities::{LocalizedName, SortDirection};
use crate::error::DomainError;

/// Classify a SeaORM error for callers
///
/// Connection problems are transient, a lost update is a concurrency
/// conflict and unique index violations mean the entity already exists.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        return DomainError::AlreadyExists(msg);
    }

    match e {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => DomainError::Transient(e.to_string()),
        DbErr::RecordNotUpdated => {
            DomainError::Concurrency("Row was changed or removed by another writer".to_string())
        }
        e => DomainError::Database(e.to_string()),
    }
}

pub(crate) fn sea_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

pub(crate) fn names_to_json(names: &[LocalizedName]) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(names)
        .map_err(|e| DomainError::Internal(format!("Failed to encode display names: {}", e)))
}

pub(crate) fn names_from_json(
    value: serde_json::Value,
) -> Result<Vec<LocalizedName>, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::Internal(format!("Failed to decode display names: {}", e)))
}

/// Escape `LIKE` wildcards so `keyword` matches literally
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `column LIKE '%keyword%'` with the keyword taken as a plain substring
pub(crate) fn contains_literal<C: IntoColumnRef>(column: C, keyword: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(keyword));
    Expr::col(column).like(LikeExpr::new(pattern).escape('\\'))
}
