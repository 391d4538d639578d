use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inventories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: String,
    pub fulfillment_center_id: Option<Uuid>,
    pub status: String,
    pub in_stock_quantity: i64,
    pub reserved_quantity: i64,
    pub reorder_min_quantity: i64,
    pub allow_backorder: bool,
    pub backorder_quantity: i64,
    pub backorder_available_date: Option<DateTimeWithTimeZone>,
    pub allow_preorder: bool,
    pub preorder_quantity: i64,
    pub preorder_available_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fulfillment_centers::Entity",
        from = "Column::FulfillmentCenterId",
        to = "super::fulfillment_centers::Column::Id",
        on_delete = "SetNull"
    )]
    FulfillmentCenter,
}

impl Related<super::fulfillment_centers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FulfillmentCenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
