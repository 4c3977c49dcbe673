use crate::entities::{event_entity, fee_scheme_entity, prize_scheme_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateFeeSchemeRequest {
    pub name: String,
    pub entry_fee_cents: i64,
    pub max_bird_count: i32,
    pub max_backup_bird_count: i32,
    /// Ordered per-slot perch fees; length must equal max_bird_count.
    pub perch_fees_cents: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FeeSchemeResponse {
    pub id: i64,
    pub name: String,
    pub entry_fee_cents: i64,
    pub max_bird_count: i32,
    pub max_backup_bird_count: i32,
    pub perch_fees_cents: Vec<i64>,
}

impl FeeSchemeResponse {
    pub fn from_parts(scheme: fee_scheme_entity::Model, perch_fees_cents: Vec<i64>) -> Self {
        Self {
            id: scheme.id,
            name: scheme.name,
            entry_fee_cents: scheme.entry_fee_cents,
            max_bird_count: scheme.max_bird_count,
            max_backup_bird_count: scheme.max_backup_bird_count,
            perch_fees_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub season_year: i32,
    pub id_fee_scheme: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    pub name: Option<String>,
    pub is_open: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePrizeSchemeRequest {
    pub name: String,
    pub rank_from: i32,
    pub rank_to: i32,
    pub amount_cents: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrizeSchemeResponse {
    pub id: i64,
    pub id_event: i64,
    pub name: String,
    pub rank_from: i32,
    pub rank_to: i32,
    pub amount_cents: i64,
}

impl From<prize_scheme_entity::Model> for PrizeSchemeResponse {
    fn from(m: prize_scheme_entity::Model) -> Self {
        Self {
            id: m.id,
            id_event: m.id_event,
            name: m.name,
            rank_from: m.rank_from,
            rank_to: m.rank_to,
            amount_cents: m.amount_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    pub season_year: i32,
    pub id_fee_scheme: i64,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

impl From<event_entity::Model> for EventResponse {
    fn from(m: event_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            season_year: m.season_year,
            id_fee_scheme: m.id_fee_scheme,
            is_open: m.is_open,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventDetailResponse {
    pub event: EventResponse,
    pub fee_scheme: FeeSchemeResponse,
    pub prize_schemes: Vec<PrizeSchemeResponse>,
}
