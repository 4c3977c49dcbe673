use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "prize_schemes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_event: i64,
    pub name: String,
    pub rank_from: i32,
    pub rank_to: i32,
    pub amount_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
