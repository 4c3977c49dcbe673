use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One bird's participation in one race. Materialized in bulk at race
/// creation from the event inventory items existing at that moment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "race_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_race: i64,
    pub id_bird: i64,
    pub is_dist_basketed: bool,
    pub id_race_basket: Option<i64>,
    pub id_dist_basket: Option<i64>,
    pub race_basket_time: Option<DateTime<Utc>>,
    pub is_lost: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
