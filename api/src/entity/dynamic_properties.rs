use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dynamic_properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub object_type: String,
    pub name: String,
    pub description: Option<String>,
    pub value_type: String,
    pub is_array: bool,
    pub is_required: bool,
    pub display_order: Option<i32>,
    /// `[{"locale": .., "name": ..}]`
    pub display_names: Json,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dynamic_property_dictionary_items::Entity")]
    DictionaryItems,
}

impl Related<super::dynamic_property_dictionary_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DictionaryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
