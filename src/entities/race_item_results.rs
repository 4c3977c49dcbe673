use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One-to-one with a race item; upserted on each arrival report.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "race_item_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_race_item: i64,
    pub arrival_time: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub speed_m_per_min: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
