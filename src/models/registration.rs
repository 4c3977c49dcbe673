use crate::entities::{event_inventory_entity, event_inventory_item_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub id_event: i64,
    /// Bird ids in slot order; the slot index decides the perch fee.
    pub bird_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    /// Gateway order id; the client completes checkout against it.
    pub order_id: String,
    pub id_event_inventory: i64,
    pub amount_cents: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryItemResponse {
    pub id: i64,
    pub id_bird: i64,
    pub perch_fee_cents: i64,
    pub entry_fee_cents: i64,
}

impl From<event_inventory_item_entity::Model> for InventoryItemResponse {
    fn from(m: event_inventory_item_entity::Model) -> Self {
        Self {
            id: m.id,
            id_bird: m.id_bird,
            perch_fee_cents: m.perch_fee_cents,
            entry_fee_cents: m.entry_fee_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryResponse {
    pub id: i64,
    pub id_event: i64,
    pub id_breeder: i64,
    pub created_at: DateTime<Utc>,
    pub items: Vec<InventoryItemResponse>,
}

impl InventoryResponse {
    pub fn from_parts(
        inventory: event_inventory_entity::Model,
        items: Vec<event_inventory_item_entity::Model>,
    ) -> Self {
        Self {
            id: inventory.id,
            id_event: inventory.id_event,
            id_breeder: inventory.id_breeder,
            created_at: inventory.created_at.unwrap_or_else(Utc::now),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}
