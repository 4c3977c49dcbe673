use crate::entities::bird_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBirdRequest {
    pub band_country: String,
    pub band_year: i32,
    pub band_series: String,
    pub band_no: String,
    pub rf_id: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub sex: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateBirdRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub sex: Option<String>,
    pub is_lost: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BirdQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub active_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BirdResponse {
    pub id: i64,
    pub id_breeder: i64,
    pub band: String,
    pub rf_id: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub sex: String,
    pub is_lost: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<bird_entity::Model> for BirdResponse {
    fn from(m: bird_entity::Model) -> Self {
        let band = format!(
            "{}-{}-{}-{}",
            m.band_country, m.band_year, m.band_series, m.band_no
        );
        Self {
            id: m.id,
            id_breeder: m.id_breeder,
            band,
            rf_id: m.rf_id,
            name: m.name,
            color: m.color,
            sex: m.sex,
            is_lost: m.is_lost,
            is_active: m.is_active,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
