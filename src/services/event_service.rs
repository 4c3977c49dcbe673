use crate::entities::{
    event_entity as events, fee_scheme_entity as fee_schemes, perch_fee_entity as perch_fees,
    prize_scheme_entity as prize_schemes,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateEventRequest, CreateFeeSchemeRequest, CreatePrizeSchemeRequest, EventDetailResponse,
    EventResponse, FeeSchemeResponse, PaginatedResponse, PaginationParams, PrizeSchemeResponse,
    UpdateEventRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct EventService {
    pool: DatabaseConnection,
}

impl EventService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Creates a fee scheme together with its ordered perch-fee table.
    pub async fn create_fee_scheme(
        &self,
        request: CreateFeeSchemeRequest,
    ) -> AppResult<FeeSchemeResponse> {
        if request.max_bird_count <= 0 {
            return Err(AppError::ValidationError(
                "max_bird_count must be positive".to_string(),
            ));
        }
        if request.max_backup_bird_count < 0 {
            return Err(AppError::ValidationError(
                "max_backup_bird_count must not be negative".to_string(),
            ));
        }
        // The perch-fee table is indexed by bird slot; one fee per slot
        if request.perch_fees_cents.len() != request.max_bird_count as usize {
            return Err(AppError::ValidationError(format!(
                "Expected {} perch fees, got {}",
                request.max_bird_count,
                request.perch_fees_cents.len()
            )));
        }
        if request.perch_fees_cents.iter().any(|&f| f < 0) || request.entry_fee_cents < 0 {
            return Err(AppError::ValidationError(
                "Fees must not be negative".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let scheme = fee_schemes::ActiveModel {
            name: Set(request.name),
            entry_fee_cents: Set(request.entry_fee_cents),
            max_bird_count: Set(request.max_bird_count),
            max_backup_bird_count: Set(request.max_backup_bird_count),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let fee_rows: Vec<perch_fees::ActiveModel> = request
            .perch_fees_cents
            .iter()
            .enumerate()
            .map(|(i, &fee)| perch_fees::ActiveModel {
                id_fee_scheme: Set(scheme.id),
                slot_no: Set(i as i32 + 1),
                fee_cents: Set(fee),
                ..Default::default()
            })
            .collect();
        perch_fees::Entity::insert_many(fee_rows).exec(&txn).await?;

        txn.commit().await?;

        Ok(FeeSchemeResponse::from_parts(
            scheme,
            request.perch_fees_cents,
        ))
    }

    pub async fn get_fee_scheme(&self, scheme_id: i64) -> AppResult<FeeSchemeResponse> {
        let scheme = fee_schemes::Entity::find_by_id(scheme_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Fee scheme not found".to_string()))?;

        let fees = self.load_perch_fees(scheme.id).await?;
        Ok(FeeSchemeResponse::from_parts(scheme, fees))
    }

    /// Ordered perch-fee values for a scheme, by slot number.
    pub async fn load_perch_fees(&self, scheme_id: i64) -> AppResult<Vec<i64>> {
        let rows = perch_fees::Entity::find()
            .filter(perch_fees::Column::IdFeeScheme.eq(scheme_id))
            .order_by_asc(perch_fees::Column::SlotNo)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.fee_cents).collect())
    }

    pub async fn create_event(&self, request: CreateEventRequest) -> AppResult<EventResponse> {
        let scheme = fee_schemes::Entity::find_by_id(request.id_fee_scheme)
            .one(&self.pool)
            .await?;
        if scheme.is_none() {
            return Err(AppError::NotFound("Fee scheme not found".to_string()));
        }

        let event = events::ActiveModel {
            name: Set(request.name),
            season_year: Set(request.season_year),
            id_fee_scheme: Set(request.id_fee_scheme),
            is_open: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(event.into())
    }

    pub async fn update_event(
        &self,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        let event = events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let mut model = event.into_active_model();
        if let Some(name) = request.name {
            model.name = Set(name);
        }
        if let Some(is_open) = request.is_open {
            model.is_open = Set(is_open);
        }
        model.updated_at = Set(Some(chrono::Utc::now()));

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    pub async fn add_prize_scheme(
        &self,
        event_id: i64,
        request: CreatePrizeSchemeRequest,
    ) -> AppResult<PrizeSchemeResponse> {
        let event = events::Entity::find_by_id(event_id).one(&self.pool).await?;
        if event.is_none() {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        if request.rank_from <= 0 || request.rank_to < request.rank_from {
            return Err(AppError::ValidationError(
                "Invalid prize rank range".to_string(),
            ));
        }

        let prize = prize_schemes::ActiveModel {
            id_event: Set(event_id),
            name: Set(request.name),
            rank_from: Set(request.rank_from),
            rank_to: Set(request.rank_to),
            amount_cents: Set(request.amount_cents),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(prize.into())
    }

    pub async fn list_events(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<EventResponse>> {
        let base = events::Entity::find();

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_desc(events::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<EventResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(20),
            total,
        ))
    }

    pub async fn get_event_detail(&self, event_id: i64) -> AppResult<EventDetailResponse> {
        let event = events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let scheme = fee_schemes::Entity::find_by_id(event.id_fee_scheme)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Fee scheme not found".to_string()))?;
        let fees = self.load_perch_fees(scheme.id).await?;

        let prizes = prize_schemes::Entity::find()
            .filter(prize_schemes::Column::IdEvent.eq(event_id))
            .order_by_asc(prize_schemes::Column::RankFrom)
            .all(&self.pool)
            .await?;

        Ok(EventDetailResponse {
            event: event.into(),
            fee_scheme: FeeSchemeResponse::from_parts(scheme, fees),
            prize_schemes: prizes.into_iter().map(Into::into).collect(),
        })
    }
}
