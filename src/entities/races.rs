use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "race_type")]
#[serde(rename_all = "snake_case")]
pub enum RaceType {
    #[sea_orm(string_value = "training")]
    Training,
    #[sea_orm(string_value = "inventory")]
    Inventory,
    #[sea_orm(string_value = "hotspot")]
    Hotspot,
    #[sea_orm(string_value = "semifinal")]
    Semifinal,
    #[sea_orm(string_value = "final")]
    Final,
}

impl std::fmt::Display for RaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaceType::Training => write!(f, "training"),
            RaceType::Inventory => write!(f, "inventory"),
            RaceType::Hotspot => write!(f, "hotspot"),
            RaceType::Semifinal => write!(f, "semifinal"),
            RaceType::Final => write!(f, "final"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "races")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_event: i64,
    pub race_type: RaceType,
    /// Sequential per (event, race_type).
    pub race_no: i32,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub distance_m: Option<i64>,
    pub weather: Option<String>,
    pub release_point: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
