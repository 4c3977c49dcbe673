use crate::entities::breeder_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterBreederRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub breeder: BreederResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BreederResponse {
    pub id: i64,
    pub breeder_no: i64,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<breeder_entity::Model> for BreederResponse {
    fn from(m: breeder_entity::Model) -> Self {
        Self {
            id: m.id,
            breeder_no: m.breeder_no,
            name: m.name,
            email: m.email,
            is_admin: m.is_admin,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}
