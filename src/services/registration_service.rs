use crate::entities::{
    PaymentStatus, bird_entity as birds, event_entity as events,
    event_inventory_entity as inventories, event_inventory_item_entity as inventory_items,
    fee_scheme_entity as fee_schemes, payment_entity as payments,
    perch_fee_entity as perch_fees,
};
use crate::error::{AppError, AppResult};
use crate::external::{OrderLineItem, PayPalService};
use crate::models::{InventoryResponse, RegisterRequest, RegisterResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::{HashMap, HashSet};

#[derive(Clone)]
pub struct RegistrationService {
    pool: DatabaseConnection,
    paypal_service: PayPalService,
}

impl RegistrationService {
    pub fn new(pool: DatabaseConnection, paypal_service: PayPalService) -> Self {
        Self {
            pool,
            paypal_service,
        }
    }

    /// Reserves the submitted birds into the event and opens a gateway
    /// order for the total fee. The inventory, its items and the pending
    /// payment are persisted in one transaction, after both gateway calls
    /// have succeeded; a gateway failure leaves the store untouched.
    pub async fn register(
        &self,
        breeder_id: i64,
        request: RegisterRequest,
    ) -> AppResult<RegisterResponse> {
        let event = events::Entity::find_by_id(request.id_event)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        if !event.is_open {
            return Err(AppError::Conflict(
                "Event is closed for registration".to_string(),
            ));
        }

        let scheme = fee_schemes::Entity::find_by_id(event.id_fee_scheme)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Fee scheme not found".to_string()))?;

        if request.bird_ids.is_empty() {
            return Err(AppError::ValidationError(
                "At least one bird is required".to_string(),
            ));
        }

        let unique: HashSet<i64> = request.bird_ids.iter().copied().collect();
        if unique.len() != request.bird_ids.len() {
            return Err(AppError::ValidationError(
                "Duplicate birds in submission".to_string(),
            ));
        }

        if request.bird_ids.len() > scheme.total_slots() {
            return Err(AppError::CapacityExceeded(format!(
                "Fee scheme allows at most {} birds",
                scheme.total_slots()
            )));
        }

        let bird_models = birds::Entity::find()
            .filter(birds::Column::Id.is_in(request.bird_ids.clone()))
            .all(&self.pool)
            .await?;
        let by_id: HashMap<i64, &birds::Model> = bird_models.iter().map(|b| (b.id, b)).collect();

        for bird_id in &request.bird_ids {
            let bird = by_id
                .get(bird_id)
                .ok_or_else(|| AppError::NotFound(format!("Bird {} not found", bird_id)))?;
            if bird.id_breeder != breeder_id {
                return Err(AppError::Forbidden);
            }
            if !bird.is_active {
                return Err(AppError::ValidationError(format!(
                    "Bird {} is not active",
                    bird_id
                )));
            }
        }

        let fee_table = perch_fees::Entity::find()
            .filter(perch_fees::Column::IdFeeScheme.eq(scheme.id))
            .order_by_asc(perch_fees::Column::SlotNo)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|r| r.fee_cents)
            .collect::<Vec<_>>();
        if fee_table.is_empty() {
            return Err(AppError::ValidationError(
                "Fee scheme has no perch fees configured".to_string(),
            ));
        }

        // Fee follows the submitted slot, not the bird
        let fees = slot_fees(&fee_table, request.bird_ids.len());
        let total: i64 = fees.iter().sum();

        // Both gateway calls happen before anything is written, so a
        // gateway failure cannot strand a reservation without an order
        let access_token = self.paypal_service.get_access_token().await?;

        let line_items: Vec<OrderLineItem> = request
            .bird_ids
            .iter()
            .zip(fees.iter())
            .enumerate()
            .map(|(i, (bird_id, &fee))| {
                let band = by_id
                    .get(bird_id)
                    .map(|b| format!("{}-{}-{}-{}", b.band_country, b.band_year, b.band_series, b.band_no))
                    .unwrap_or_else(|| bird_id.to_string());
                OrderLineItem {
                    name: format!("Perch {} - {}", i + 1, band),
                    amount_cents: fee,
                }
            })
            .collect();

        let order_id = self
            .paypal_service
            .create_order(&access_token, total, &line_items)
            .await?;

        let txn = self.pool.begin().await?;

        let inventory = inventories::ActiveModel {
            id_event: Set(event.id),
            id_breeder: Set(breeder_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let item_rows: Vec<inventory_items::ActiveModel> = request
            .bird_ids
            .iter()
            .zip(fees.iter())
            .map(|(&bird_id, &fee)| inventory_items::ActiveModel {
                id_event_inventory: Set(inventory.id),
                id_bird: Set(bird_id),
                perch_fee_cents: Set(fee),
                entry_fee_cents: Set(scheme.entry_fee_cents),
                ..Default::default()
            })
            .collect();
        inventory_items::Entity::insert_many(item_rows)
            .exec(&txn)
            .await?;

        payments::ActiveModel {
            id_breeder: Set(breeder_id),
            id_event_inventory: Set(inventory.id),
            order_id: Set(order_id.clone()),
            capture_id: Set(None),
            amount_cents: Set(total),
            status: Set(PaymentStatus::Pending),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Breeder {} reserved {} birds into event {} (order {})",
            breeder_id,
            request.bird_ids.len(),
            event.id,
            order_id
        );

        Ok(RegisterResponse {
            order_id,
            id_event_inventory: inventory.id,
            amount_cents: total,
        })
    }

    /// Opens a fresh gateway order for an existing pending payment, e.g.
    /// after the original order expired unapproved. The stored order id is
    /// replaced; the old order is simply never captured.
    pub async fn create_payment_order(
        &self,
        breeder_id: i64,
        id_event_inventory: i64,
    ) -> AppResult<RegisterResponse> {
        let inventory = inventories::Entity::find_by_id(id_event_inventory)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found".to_string()))?;

        if inventory.id_breeder != breeder_id {
            return Err(AppError::Forbidden);
        }

        let payment = payments::Entity::find()
            .filter(payments::Column::IdEventInventory.eq(id_event_inventory))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Payment is {}, a new order can only be opened while pending",
                payment.status
            )));
        }

        let items = inventory_items::Entity::find()
            .filter(inventory_items::Column::IdEventInventory.eq(id_event_inventory))
            .order_by_asc(inventory_items::Column::Id)
            .all(&self.pool)
            .await?;

        let bird_ids: Vec<i64> = items.iter().map(|i| i.id_bird).collect();
        let bird_models = birds::Entity::find()
            .filter(birds::Column::Id.is_in(bird_ids))
            .all(&self.pool)
            .await?;
        let by_id: HashMap<i64, &birds::Model> = bird_models.iter().map(|b| (b.id, b)).collect();

        let line_items: Vec<OrderLineItem> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let band = by_id
                    .get(&item.id_bird)
                    .map(|b| format!("{}-{}-{}-{}", b.band_country, b.band_year, b.band_series, b.band_no))
                    .unwrap_or_else(|| item.id_bird.to_string());
                OrderLineItem {
                    name: format!("Perch {} - {}", i + 1, band),
                    amount_cents: item.perch_fee_cents,
                }
            })
            .collect();

        let access_token = self.paypal_service.get_access_token().await?;
        let order_id = self
            .paypal_service
            .create_order(&access_token, payment.amount_cents, &line_items)
            .await?;

        let amount_cents = payment.amount_cents;
        let mut model = payment.into_active_model();
        model.order_id = Set(order_id.clone());
        model.updated_at = Set(Some(chrono::Utc::now()));
        model.update(&self.pool).await?;

        Ok(RegisterResponse {
            order_id,
            id_event_inventory,
            amount_cents,
        })
    }

    pub async fn list_my_inventories(&self, breeder_id: i64) -> AppResult<Vec<InventoryResponse>> {
        let inventory_models = inventories::Entity::find()
            .filter(inventories::Column::IdBreeder.eq(breeder_id))
            .order_by_desc(inventories::Column::Id)
            .all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(inventory_models.len());
        for inventory in inventory_models {
            let items = inventory_items::Entity::find()
                .filter(inventory_items::Column::IdEventInventory.eq(inventory.id))
                .order_by_asc(inventory_items::Column::Id)
                .all(&self.pool)
                .await?;
            result.push(InventoryResponse::from_parts(inventory, items));
        }

        Ok(result)
    }
}

/// Perch fee per submitted slot, in submission order. A slot index past
/// the end of the configured table pays the last configured fee (backup
/// birds beyond max_bird_count).
pub fn slot_fees(perch_fees: &[i64], count: usize) -> Vec<i64> {
    (0..count)
        .map(|i| perch_fees[i.min(perch_fees.len() - 1)])
        .collect()
}
