use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "perch_fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_fee_scheme: i64,
    pub slot_no: i32,
    pub fee_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
