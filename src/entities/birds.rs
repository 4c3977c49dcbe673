use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "birds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_breeder: i64,
    pub band_country: String,
    pub band_year: i32,
    pub band_series: String,
    pub band_no: String,
    pub rf_id: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub sex: String,
    pub is_lost: bool,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
