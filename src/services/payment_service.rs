use crate::entities::{
    PaymentStatus, event_inventory_entity as inventories,
    event_inventory_item_entity as inventory_items, payment_entity as payments,
};
use crate::error::{AppError, AppResult};
use crate::external::PayPalService;
use crate::models::{PaginatedResponse, PaymentQuery, PaymentResponse, SettlementResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    paypal_service: PayPalService,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, paypal_service: PayPalService) -> Self {
        Self {
            pool,
            paypal_service,
        }
    }

    /// Captures the gateway order backing a payment and reconciles the
    /// local row with the gateway outcome. Capturing an already-captured
    /// payment is a no-op success; no second gateway call is made.
    pub async fn capture(&self, order_id: &str) -> AppResult<SettlementResponse> {
        let payment = payments::Entity::find()
            .filter(payments::Column::OrderId.eq(order_id.to_string()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status == PaymentStatus::Captured {
            log::info!("Order {} already captured, nothing to do", order_id);
            return Ok(SettlementResponse {
                order_id: payment.order_id,
                status: payment.status,
                capture_id: payment.capture_id,
            });
        }

        let access_token = self.paypal_service.get_access_token().await?;
        let outcome = self
            .paypal_service
            .capture_order(&access_token, order_id)
            .await?;

        match outcome.status.as_str() {
            "COMPLETED" => {
                // Status flip and capture id land together
                let txn = self.pool.begin().await?;
                let mut model = payment.into_active_model();
                model.status = Set(PaymentStatus::Captured);
                model.capture_id = Set(outcome.capture_id.clone());
                model.updated_at = Set(Some(chrono::Utc::now()));
                let updated = model.update(&txn).await?;
                txn.commit().await?;

                log::info!("Captured order {} ({:?})", order_id, updated.capture_id);

                Ok(SettlementResponse {
                    order_id: updated.order_id,
                    status: updated.status,
                    capture_id: updated.capture_id,
                })
            }
            "PENDING" => {
                let mut model = payment.into_active_model();
                model.status = Set(PaymentStatus::PendingConfirmation);
                model.updated_at = Set(Some(chrono::Utc::now()));
                let updated = model.update(&self.pool).await?;

                log::info!("Capture of order {} pending gateway confirmation", order_id);

                Ok(SettlementResponse {
                    order_id: updated.order_id,
                    status: updated.status,
                    capture_id: updated.capture_id,
                })
            }
            other => {
                // The reservation stays; releasing slots is cancel's job
                // while the payment is still pending
                let mut model = payment.into_active_model();
                model.status = Set(PaymentStatus::Failed);
                model.updated_at = Set(Some(chrono::Utc::now()));
                model.update(&self.pool).await?;

                Err(AppError::ExternalServiceError(format!(
                    "Capture of order {} returned status {}",
                    order_id, other
                )))
            }
        }
    }

    /// Cancels a still-pending payment and releases the reservation it
    /// funds. Children are deleted before parents: items, inventory,
    /// payment, all in one transaction.
    pub async fn cancel(&self, order_id: &str, breeder_id: i64) -> AppResult<()> {
        let payment = payments::Entity::find()
            .filter(payments::Column::OrderId.eq(order_id.to_string()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.id_breeder != breeder_id {
            return Err(AppError::Forbidden);
        }

        if payment.status != PaymentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Only pending payments can be cancelled, this one is {}",
                payment.status
            )));
        }

        let txn = self.pool.begin().await?;

        inventory_items::Entity::delete_many()
            .filter(inventory_items::Column::IdEventInventory.eq(payment.id_event_inventory))
            .exec(&txn)
            .await?;

        inventories::Entity::delete_many()
            .filter(inventories::Column::Id.eq(payment.id_event_inventory))
            .exec(&txn)
            .await?;

        payment.delete(&txn).await?;

        txn.commit().await?;

        log::info!(
            "Breeder {} cancelled order {} and released its reservation",
            breeder_id,
            order_id
        );

        Ok(())
    }

    pub async fn get_my_payments(
        &self,
        breeder_id: i64,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let params = crate::models::PaginationParams::new(query.page, query.per_page);

        let base = payments::Entity::find().filter(payments::Column::IdBreeder.eq(breeder_id));

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(payments::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<PaymentResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(20),
            total,
        ))
    }
}
