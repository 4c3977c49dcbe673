use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "fee_schemes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub entry_fee_cents: i64,
    pub max_bird_count: i32,
    pub max_backup_bird_count: i32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Total bird slots a breeder may reserve under this scheme.
    pub fn total_slots(&self) -> usize {
        (self.max_bird_count + self.max_backup_bird_count).max(0) as usize
    }
}
