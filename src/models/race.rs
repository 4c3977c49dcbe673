use crate::entities::{RaceType, basket_entity, race_entity, race_item_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateRaceRequest {
    pub race_type: RaceType,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub distance_m: Option<i64>,
    pub weather: Option<String>,
    pub release_point: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RaceResponse {
    pub id: i64,
    pub id_event: i64,
    pub race_type: RaceType,
    pub race_no: i32,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub distance_m: Option<i64>,
    pub weather: Option<String>,
    pub release_point: Option<String>,
}

impl From<race_entity::Model> for RaceResponse {
    fn from(m: race_entity::Model) -> Self {
        Self {
            id: m.id,
            id_event: m.id_event,
            race_type: m.race_type,
            race_no: m.race_no,
            name: m.name,
            start_time: m.start_time,
            distance_m: m.distance_m,
            weather: m.weather,
            release_point: m.release_point,
        }
    }
}

/// Per-race aggregation used by the race-day dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RaceStatsResponse {
    #[serde(flatten)]
    pub race: RaceResponse,
    pub total_birds: i64,
    pub basketed: i64,
    pub arrived: i64,
    pub lost: i64,
    pub not_arrived: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBasketRequest {
    /// Sequential per (race, is_race_basket) when omitted.
    pub basket_no: Option<i32>,
    pub is_race_basket: bool,
    pub capacity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateBasketRequest {
    pub basket_no: Option<i32>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BasketResponse {
    pub id: i64,
    pub id_race: i64,
    pub basket_no: i32,
    pub is_race_basket: bool,
    pub capacity: i32,
    pub occupancy: i64,
}

impl BasketResponse {
    pub fn from_parts(m: basket_entity::Model, occupancy: i64) -> Self {
        Self {
            id: m.id,
            id_race: m.id_race,
            basket_no: m.basket_no,
            is_race_basket: m.is_race_basket,
            capacity: m.capacity,
            occupancy,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignBasketRequest {
    pub id_basket: i64,
    pub rf_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRaceItemRequest {
    pub is_lost: Option<bool>,
    /// Detach the item from both baskets (bird pulled before shipping).
    pub clear_baskets: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RaceItemResponse {
    pub id: i64,
    pub id_race: i64,
    pub id_bird: i64,
    pub is_dist_basketed: bool,
    pub id_race_basket: Option<i64>,
    pub id_dist_basket: Option<i64>,
    pub race_basket_time: Option<DateTime<Utc>>,
    pub is_lost: bool,
}

impl From<race_item_entity::Model> for RaceItemResponse {
    fn from(m: race_item_entity::Model) -> Self {
        Self {
            id: m.id,
            id_race: m.id_race,
            id_bird: m.id_bird,
            is_dist_basketed: m.is_dist_basketed,
            id_race_basket: m.id_race_basket,
            id_dist_basket: m.id_dist_basket,
            race_basket_time: m.race_basket_time,
            is_lost: m.is_lost,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublishResultRequest {
    pub rf_id: String,
    /// Scanner-provided arrival time; server time when omitted.
    pub arrival_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RaceResultResponse {
    pub id_race_item: i64,
    pub id_bird: i64,
    pub rf_id: String,
    pub band: String,
    pub arrival_time: DateTime<Utc>,
    pub elapsed_seconds: i64,
    pub speed_m_per_min: Option<f64>,
}
