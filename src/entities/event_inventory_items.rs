use sea_orm::entity::prelude::*;

/// Fee values are snapshots taken at registration time; they are never
/// recomputed from the fee scheme afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "event_inventory_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_event_inventory: i64,
    pub id_bird: i64,
    pub perch_fee_cents: i64,
    pub entry_fee_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
