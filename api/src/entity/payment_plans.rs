use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub interval: String,
    pub interval_count: i32,
    pub trial_period_days: i32,
    pub created_at: DateTimeWithTimeZone,
    pub created_by: Option<String>,
    pub modified_at: Option<DateTimeWithTimeZone>,
    pub modified_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
