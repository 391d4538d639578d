use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dynamic_property_dictionary_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub name: String,
    pub sort_order: Option<i32>,
    pub display_names: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dynamic_properties::Entity",
        from = "Column::PropertyId",
        to = "super::dynamic_properties::Column::Id"
    )]
    DynamicProperty,
}

impl Related<super::dynamic_properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DynamicProperty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
