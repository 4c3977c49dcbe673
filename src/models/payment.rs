use crate::entities::{PaymentStatus, payment_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CapturePaymentRequest {
    pub order_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CancelPaymentRequest {
    pub order_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettlementResponse {
    pub order_id: String,
    pub status: PaymentStatus,
    pub capture_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub id_event_inventory: i64,
    pub order_id: String,
    pub capture_id: Option<String>,
    pub amount_cents: i64,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<payment_entity::Model> for PaymentResponse {
    fn from(m: payment_entity::Model) -> Self {
        Self {
            id: m.id,
            id_event_inventory: m.id_event_inventory,
            order_id: m.order_id,
            capture_id: m.capture_id,
            amount_cents: m.amount_cents,
            status: m.status,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
