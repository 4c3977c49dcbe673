use crate::entities::bird_entity as birds;
use crate::error::{AppError, AppResult};
use crate::models::{
    BirdQuery, BirdResponse, CreateBirdRequest, PaginatedResponse, PaginationParams,
    UpdateBirdRequest,
};
use crate::utils::{validate_band, validate_rf_id};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

const SEXES: [&str; 3] = ["cock", "hen", "unknown"];

#[derive(Clone)]
pub struct BirdService {
    pool: DatabaseConnection,
}

impl BirdService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_bird(
        &self,
        breeder_id: i64,
        request: CreateBirdRequest,
    ) -> AppResult<BirdResponse> {
        validate_band(
            &request.band_country,
            request.band_year,
            &request.band_series,
            &request.band_no,
        )?;
        validate_rf_id(&request.rf_id)?;

        let sex = request.sex.unwrap_or_else(|| "unknown".to_string());
        if !SEXES.contains(&sex.as_str()) {
            return Err(AppError::ValidationError(
                "Sex must be cock, hen or unknown".to_string(),
            ));
        }

        // RF-ID is unique across the whole platform
        let existing = birds::Entity::find()
            .filter(birds::Column::RfId.eq(request.rf_id.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "A bird with this RF-ID already exists".to_string(),
            ));
        }

        let bird = birds::ActiveModel {
            id_breeder: Set(breeder_id),
            band_country: Set(request.band_country),
            band_year: Set(request.band_year),
            band_series: Set(request.band_series),
            band_no: Set(request.band_no),
            rf_id: Set(request.rf_id),
            name: Set(request.name),
            color: Set(request.color),
            sex: Set(sex),
            is_lost: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(bird.into())
    }

    pub async fn get_bird(&self, breeder_id: i64, bird_id: i64) -> AppResult<BirdResponse> {
        let bird = self.find_owned(breeder_id, bird_id).await?;
        Ok(bird.into())
    }

    pub async fn list_birds(
        &self,
        breeder_id: i64,
        query: &BirdQuery,
    ) -> AppResult<PaginatedResponse<BirdResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base = birds::Entity::find().filter(birds::Column::IdBreeder.eq(breeder_id));
        if query.active_only.unwrap_or(false) {
            base = base.filter(birds::Column::IsActive.eq(true));
        }

        let total = base.clone().count(&self.pool).await? as i64;

        let models = base
            .order_by_asc(birds::Column::Id)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<BirdResponse> = models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(20),
            total,
        ))
    }

    pub async fn update_bird(
        &self,
        breeder_id: i64,
        bird_id: i64,
        request: UpdateBirdRequest,
    ) -> AppResult<BirdResponse> {
        let bird = self.find_owned(breeder_id, bird_id).await?;

        if let Some(sex) = &request.sex {
            if !SEXES.contains(&sex.as_str()) {
                return Err(AppError::ValidationError(
                    "Sex must be cock, hen or unknown".to_string(),
                ));
            }
        }

        let mut model = bird.into_active_model();
        if let Some(name) = request.name {
            model.name = Set(Some(name));
        }
        if let Some(color) = request.color {
            model.color = Set(Some(color));
        }
        if let Some(sex) = request.sex {
            model.sex = Set(sex);
        }
        if let Some(is_lost) = request.is_lost {
            model.is_lost = Set(is_lost);
        }
        if let Some(is_active) = request.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(chrono::Utc::now()));

        let updated = model.update(&self.pool).await?;
        Ok(updated.into())
    }

    async fn find_owned(&self, breeder_id: i64, bird_id: i64) -> AppResult<birds::Model> {
        let bird = birds::Entity::find_by_id(bird_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Bird not found".to_string()))?;

        if bird.id_breeder != breeder_id {
            return Err(AppError::Forbidden);
        }

        Ok(bird)
    }
}
