use crate::entities::{
    basket_entity as baskets, bird_entity as birds, event_entity as events,
    event_inventory_entity as inventories, event_inventory_item_entity as inventory_items,
    race_entity as races, race_item_entity as race_items,
    race_item_result_entity as race_item_results,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AssignBasketRequest, BasketResponse, CreateBasketRequest, CreateRaceRequest,
    PublishResultRequest, RaceItemResponse, RaceResponse, RaceResultResponse, RaceStatsResponse,
    UpdateBasketRequest, UpdateRaceItemRequest,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

#[derive(Clone)]
pub struct RaceService {
    pool: DatabaseConnection,
}

impl RaceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Creates a race and materializes one race item per inventory item
    /// currently under the event, in one transaction. Birds registered
    /// after this point do not join the race.
    pub async fn create_race(
        &self,
        event_id: i64,
        request: CreateRaceRequest,
    ) -> AppResult<RaceResponse> {
        let event = events::Entity::find_by_id(event_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let txn = self.pool.begin().await?;

        // Auto-number per (event, race type)
        let existing = races::Entity::find()
            .filter(races::Column::IdEvent.eq(event.id))
            .filter(races::Column::RaceType.eq(request.race_type.clone()))
            .count(&txn)
            .await? as i32;

        let race = races::ActiveModel {
            id_event: Set(event.id),
            race_type: Set(request.race_type),
            race_no: Set(existing + 1),
            name: Set(request.name),
            start_time: Set(request.start_time),
            distance_m: Set(request.distance_m),
            weather: Set(request.weather),
            release_point: Set(request.release_point),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let inventory_ids: Vec<i64> = inventories::Entity::find()
            .filter(inventories::Column::IdEvent.eq(event.id))
            .select_only()
            .column(inventories::Column::Id)
            .into_tuple()
            .all(&txn)
            .await?;

        if !inventory_ids.is_empty() {
            let items = inventory_items::Entity::find()
                .filter(inventory_items::Column::IdEventInventory.is_in(inventory_ids))
                .all(&txn)
                .await?;

            if !items.is_empty() {
                let rows: Vec<race_items::ActiveModel> = items
                    .iter()
                    .map(|item| race_items::ActiveModel {
                        id_race: Set(race.id),
                        id_bird: Set(item.id_bird),
                        is_dist_basketed: Set(false),
                        id_race_basket: Set(None),
                        id_dist_basket: Set(None),
                        race_basket_time: Set(None),
                        is_lost: Set(false),
                        ..Default::default()
                    })
                    .collect();
                race_items::Entity::insert_many(rows).exec(&txn).await?;
            }
        }

        txn.commit().await?;

        log::info!(
            "Created race {} #{} for event {}",
            race.race_type,
            race.race_no,
            event.id
        );

        Ok(race.into())
    }

    pub async fn list_races(&self, event_id: i64) -> AppResult<Vec<RaceStatsResponse>> {
        let race_models = races::Entity::find()
            .filter(races::Column::IdEvent.eq(event_id))
            .order_by_asc(races::Column::Id)
            .all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(race_models.len());
        for race in race_models {
            let stats = self.race_stats(race.id).await?;
            result.push(RaceStatsResponse {
                race: race.into(),
                total_birds: stats.total,
                basketed: stats.basketed,
                arrived: stats.arrived,
                lost: stats.lost,
                not_arrived: stats.not_arrived(),
            });
        }

        Ok(result)
    }

    pub async fn get_race(&self, race_id: i64) -> AppResult<RaceResponse> {
        let race = races::Entity::find_by_id(race_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Race not found".to_string()))?;
        Ok(race.into())
    }

    /// Places the bird identified by RF-ID into a basket of this race.
    /// The basket row is locked for the occupancy check, so two
    /// concurrent assignments cannot overbook the last slot.
    pub async fn assign_to_basket(
        &self,
        race_id: i64,
        request: AssignBasketRequest,
    ) -> AppResult<RaceItemResponse> {
        let txn = self.pool.begin().await?;

        let bird = birds::Entity::find()
            .filter(birds::Column::RfId.eq(request.rf_id.clone()))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("No bird with this RF-ID".to_string()))?;

        let item = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .filter(race_items::Column::IdBird.eq(bird.id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Bird is not entered into this race".to_string())
            })?;

        let basket = baskets::Entity::find_by_id(request.id_basket)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Basket not found".to_string()))?;

        if basket.id_race != race_id {
            return Err(AppError::ValidationError(
                "Basket does not belong to this race".to_string(),
            ));
        }

        // Already in this basket: report current state, change nothing
        let current = if basket.is_race_basket {
            item.id_race_basket
        } else {
            item.id_dist_basket
        };
        if current == Some(basket.id) {
            txn.commit().await?;
            return Ok(item.into());
        }

        let occupancy = basket_occupancy(&txn, &basket).await?;
        if occupancy >= basket.capacity as i64 {
            return Err(AppError::CapacityExceeded(format!(
                "Basket {} is full ({} / {})",
                basket.basket_no, occupancy, basket.capacity
            )));
        }

        let mut model = item.into_active_model();
        if basket.is_race_basket {
            model.id_race_basket = Set(Some(basket.id));
            model.race_basket_time = Set(Some(Utc::now()));
        } else {
            model.id_dist_basket = Set(Some(basket.id));
            model.is_dist_basketed = Set(true);
        }
        let updated = model.update(&txn).await?;

        txn.commit().await?;

        Ok(updated.into())
    }

    pub async fn create_basket(
        &self,
        race_id: i64,
        request: CreateBasketRequest,
    ) -> AppResult<BasketResponse> {
        let race = races::Entity::find_by_id(race_id).one(&self.pool).await?;
        if race.is_none() {
            return Err(AppError::NotFound("Race not found".to_string()));
        }

        if request.capacity <= 0 {
            return Err(AppError::ValidationError(
                "Basket capacity must be positive".to_string(),
            ));
        }

        let basket_no = match request.basket_no {
            Some(no) => no,
            None => {
                // Sequential per (race, basket kind)
                let existing = baskets::Entity::find()
                    .filter(baskets::Column::IdRace.eq(race_id))
                    .filter(baskets::Column::IsRaceBasket.eq(request.is_race_basket))
                    .count(&self.pool)
                    .await? as i32;
                existing + 1
            }
        };

        let basket = baskets::ActiveModel {
            id_race: Set(race_id),
            basket_no: Set(basket_no),
            is_race_basket: Set(request.is_race_basket),
            capacity: Set(request.capacity),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(BasketResponse::from_parts(basket, 0))
    }

    pub async fn update_basket(
        &self,
        basket_id: i64,
        request: UpdateBasketRequest,
    ) -> AppResult<BasketResponse> {
        let basket = baskets::Entity::find_by_id(basket_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Basket not found".to_string()))?;

        let occupancy = basket_occupancy(&self.pool, &basket).await?;

        if let Some(capacity) = request.capacity {
            if capacity <= 0 {
                return Err(AppError::ValidationError(
                    "Basket capacity must be positive".to_string(),
                ));
            }
            if (capacity as i64) < occupancy {
                return Err(AppError::Conflict(format!(
                    "Basket holds {} birds, capacity cannot drop below that",
                    occupancy
                )));
            }
        }

        let mut model = basket.into_active_model();
        if let Some(no) = request.basket_no {
            model.basket_no = Set(no);
        }
        if let Some(capacity) = request.capacity {
            model.capacity = Set(capacity);
        }
        let updated = model.update(&self.pool).await?;

        Ok(BasketResponse::from_parts(updated, occupancy))
    }

    /// Baskets cannot vanish out from under assigned birds: deletion is
    /// refused while any race item references the basket through either
    /// foreign key.
    pub async fn delete_basket(&self, basket_id: i64) -> AppResult<()> {
        let basket = baskets::Entity::find_by_id(basket_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Basket not found".to_string()))?;

        let referencing = race_items::Entity::find()
            .filter(
                Condition::any()
                    .add(race_items::Column::IdRaceBasket.eq(basket.id))
                    .add(race_items::Column::IdDistBasket.eq(basket.id)),
            )
            .count(&self.pool)
            .await?;

        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "Basket still holds {} birds",
                referencing
            )));
        }

        basket.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn list_baskets(&self, race_id: i64) -> AppResult<Vec<BasketResponse>> {
        let basket_models = baskets::Entity::find()
            .filter(baskets::Column::IdRace.eq(race_id))
            .order_by_asc(baskets::Column::BasketNo)
            .all(&self.pool)
            .await?;

        let mut result = Vec::with_capacity(basket_models.len());
        for basket in basket_models {
            let column = if basket.is_race_basket {
                race_items::Column::IdRaceBasket
            } else {
                race_items::Column::IdDistBasket
            };
            let occupancy = race_items::Entity::find()
                .filter(column.eq(basket.id))
                .count(&self.pool)
                .await? as i64;
            result.push(BasketResponse::from_parts(basket, occupancy));
        }

        Ok(result)
    }

    pub async fn list_race_items(&self, race_id: i64) -> AppResult<Vec<RaceItemResponse>> {
        let items = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .order_by_asc(race_items::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn update_race_item(
        &self,
        race_item_id: i64,
        request: UpdateRaceItemRequest,
    ) -> AppResult<RaceItemResponse> {
        let item = race_items::Entity::find_by_id(race_item_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Race item not found".to_string()))?;

        let mut model = item.into_active_model();
        if let Some(is_lost) = request.is_lost {
            model.is_lost = Set(is_lost);
        }
        if request.clear_baskets.unwrap_or(false) {
            model.id_race_basket = Set(None);
            model.id_dist_basket = Set(None);
            model.is_dist_basketed = Set(false);
            model.race_basket_time = Set(None);
        }
        let updated = model.update(&self.pool).await?;

        Ok(updated.into())
    }

    /// Records an arrival for the bird identified by RF-ID. The result
    /// row is upserted: reporting the same bird again moves its arrival
    /// time instead of creating a duplicate.
    pub async fn publish_result(
        &self,
        race_id: i64,
        request: PublishResultRequest,
    ) -> AppResult<RaceResultResponse> {
        let race = races::Entity::find_by_id(race_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Race not found".to_string()))?;

        let bird = birds::Entity::find()
            .filter(birds::Column::RfId.eq(request.rf_id.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("No bird with this RF-ID".to_string()))?;

        let item = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race.id))
            .filter(race_items::Column::IdBird.eq(bird.id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Bird is not entered into this race".to_string())
            })?;

        let arrival_time = request.arrival_time.unwrap_or_else(Utc::now);
        let elapsed_seconds = (arrival_time - race.start_time).num_seconds();
        if elapsed_seconds < 0 {
            return Err(AppError::ValidationError(
                "Arrival time precedes the race start".to_string(),
            ));
        }
        let speed = speed_m_per_min(race.distance_m, elapsed_seconds);

        let txn = self.pool.begin().await?;

        let existing = race_item_results::Entity::find()
            .filter(race_item_results::Column::IdRaceItem.eq(item.id))
            .one(&txn)
            .await?;

        match existing {
            Some(result) => {
                let mut model = result.into_active_model();
                model.arrival_time = Set(arrival_time);
                model.elapsed_seconds = Set(elapsed_seconds);
                model.speed_m_per_min = Set(speed);
                model.updated_at = Set(Some(Utc::now()));
                model.update(&txn).await?;
            }
            None => {
                race_item_results::ActiveModel {
                    id_race_item: Set(item.id),
                    arrival_time: Set(arrival_time),
                    elapsed_seconds: Set(elapsed_seconds),
                    speed_m_per_min: Set(speed),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;

        Ok(RaceResultResponse {
            id_race_item: item.id,
            id_bird: bird.id,
            rf_id: bird.rf_id.clone(),
            band: format!(
                "{}-{}-{}-{}",
                bird.band_country, bird.band_year, bird.band_series, bird.band_no
            ),
            arrival_time,
            elapsed_seconds,
            speed_m_per_min: speed,
        })
    }

    pub async fn list_race_results(&self, race_id: i64) -> AppResult<Vec<RaceResultResponse>> {
        let race = races::Entity::find_by_id(race_id).one(&self.pool).await?;
        if race.is_none() {
            return Err(AppError::NotFound("Race not found".to_string()));
        }

        let items = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .all(&self.pool)
            .await?;
        if items.is_empty() {
            return Ok(vec![]);
        }

        let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let bird_ids: Vec<i64> = items.iter().map(|i| i.id_bird).collect();

        let results = race_item_results::Entity::find()
            .filter(race_item_results::Column::IdRaceItem.is_in(item_ids))
            .order_by_asc(race_item_results::Column::ArrivalTime)
            .all(&self.pool)
            .await?;

        let bird_models = birds::Entity::find()
            .filter(birds::Column::Id.is_in(bird_ids))
            .all(&self.pool)
            .await?;

        let item_by_id: std::collections::HashMap<i64, &race_items::Model> =
            items.iter().map(|i| (i.id, i)).collect();
        let bird_by_id: std::collections::HashMap<i64, &birds::Model> =
            bird_models.iter().map(|b| (b.id, b)).collect();

        let mut rows = Vec::with_capacity(results.len());
        for result in results {
            let Some(item) = item_by_id.get(&result.id_race_item) else {
                continue;
            };
            let Some(bird) = bird_by_id.get(&item.id_bird) else {
                continue;
            };
            rows.push(RaceResultResponse {
                id_race_item: item.id,
                id_bird: bird.id,
                rf_id: bird.rf_id.clone(),
                band: format!(
                    "{}-{}-{}-{}",
                    bird.band_country, bird.band_year, bird.band_series, bird.band_no
                ),
                arrival_time: result.arrival_time,
                elapsed_seconds: result.elapsed_seconds,
                speed_m_per_min: result.speed_m_per_min,
            });
        }

        Ok(rows)
    }

    async fn race_stats(&self, race_id: i64) -> AppResult<RaceCounters> {
        let total = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .count(&self.pool)
            .await? as i64;

        let basketed = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .filter(race_items::Column::IdRaceBasket.is_not_null())
            .count(&self.pool)
            .await? as i64;

        let lost = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .filter(race_items::Column::IsLost.eq(true))
            .count(&self.pool)
            .await? as i64;

        let item_ids: Vec<i64> = race_items::Entity::find()
            .filter(race_items::Column::IdRace.eq(race_id))
            .select_only()
            .column(race_items::Column::Id)
            .into_tuple()
            .all(&self.pool)
            .await?;

        let arrived = if item_ids.is_empty() {
            0
        } else {
            race_item_results::Entity::find()
                .filter(race_item_results::Column::IdRaceItem.is_in(item_ids))
                .count(&self.pool)
                .await? as i64
        };

        Ok(RaceCounters {
            total,
            basketed,
            arrived,
            lost,
        })
    }
}

struct RaceCounters {
    total: i64,
    basketed: i64,
    arrived: i64,
    lost: i64,
}

impl RaceCounters {
    fn not_arrived(&self) -> i64 {
        (self.total - self.arrived - self.lost).max(0)
    }
}

async fn basket_occupancy<C: ConnectionTrait>(
    conn: &C,
    basket: &baskets::Model,
) -> AppResult<i64> {
    let column = if basket.is_race_basket {
        race_items::Column::IdRaceBasket
    } else {
        race_items::Column::IdDistBasket
    };
    let count = race_items::Entity::find()
        .filter(column.eq(basket.id))
        .count(conn)
        .await? as i64;
    Ok(count)
}

/// Average speed in metres per minute, the figure clocks are ranked by.
pub fn speed_m_per_min(distance_m: Option<i64>, elapsed_seconds: i64) -> Option<f64> {
    let distance = distance_m? as f64;
    if elapsed_seconds <= 0 {
        return None;
    }
    Some(distance / (elapsed_seconds as f64 / 60.0))
}
