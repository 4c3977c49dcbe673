use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "baskets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_race: i64,
    /// Sequential per (race, is_race_basket).
    pub basket_no: i32,
    pub is_race_basket: bool,
    pub capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
