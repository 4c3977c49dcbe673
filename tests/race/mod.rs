use crate::common;
use chrono::{Duration, Utc};
use derby_backend::entities::{
    RaceType, race_item_entity as race_items, race_item_result_entity as race_item_results,
};
use derby_backend::error::AppError;
use derby_backend::models::{
    AssignBasketRequest, CreateBasketRequest, CreateRaceRequest, PublishResultRequest,
    UpdateRaceItemRequest,
};
use derby_backend::services::RaceService;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

struct RaceFixture {
    db: DatabaseConnection,
    service: RaceService,
    race_id: i64,
    bird_ids: Vec<i64>,
}

/// Event with three registered birds and one inventory race.
async fn race_with_three_birds() -> RaceFixture {
    let db = common::setup_db().await;
    let breeder = common::create_breeder(&db, 1, "a@derby.test").await;
    let scheme = common::create_fee_scheme(&db, 0, 3, 0, &[1000, 1000, 1000]).await;
    let event = common::create_event(&db, scheme.id, true).await;

    let mut bird_ids = Vec::new();
    for i in 1..=3 {
        let bird = common::create_bird(&db, breeder.id, &format!("AA11000{}", i)).await;
        bird_ids.push(bird.id);
    }
    common::seed_inventory(&db, event.id, breeder.id, &bird_ids).await;

    let service = RaceService::new(db.clone());
    let race = service
        .create_race(
            event.id,
            CreateRaceRequest {
                race_type: RaceType::Inventory,
                name: None,
                start_time: Utc::now() - Duration::hours(3),
                distance_m: Some(120_000),
                weather: Some("clear".to_string()),
                release_point: Some("Veles".to_string()),
            },
        )
        .await
        .expect("race creation should succeed");

    RaceFixture {
        db,
        service,
        race_id: race.id,
        bird_ids,
    }
}

#[tokio::test]
async fn race_creation_materializes_items_and_numbers_per_type() {
    let fx = race_with_three_birds().await;

    let items = fx.service.list_race_items(fx.race_id).await.unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| !i.is_lost && i.id_race_basket.is_none()));

    // Late registration does not join the existing race
    let breeder2 = common::create_breeder(&fx.db, 2, "b@derby.test").await;
    let late_bird = common::create_bird(&fx.db, breeder2.id, "BB220001").await;
    let race = fx.service.get_race(fx.race_id).await.unwrap();
    common::seed_inventory(&fx.db, race.id_event, breeder2.id, &[late_bird.id]).await;
    let items = fx.service.list_race_items(fx.race_id).await.unwrap();
    assert_eq!(items.len(), 3);

    // Numbering is per (event, type): second inventory race is no. 2,
    // first training race starts over at no. 1
    let race2 = fx
        .service
        .create_race(
            race.id_event,
            CreateRaceRequest {
                race_type: RaceType::Inventory,
                name: None,
                start_time: Utc::now(),
                distance_m: None,
                weather: None,
                release_point: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(race2.race_no, 2);
    // The new race picks up the late bird as well: 4 items
    let items2 = fx.service.list_race_items(race2.id).await.unwrap();
    assert_eq!(items2.len(), 4);

    let training = fx
        .service
        .create_race(
            race.id_event,
            CreateRaceRequest {
                race_type: RaceType::Training,
                name: None,
                start_time: Utc::now(),
                distance_m: None,
                weather: None,
                release_point: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(training.race_no, 1);
}

#[tokio::test]
async fn basket_numbers_are_sequential_per_kind() {
    let fx = race_with_three_birds().await;

    let race_basket_1 = fx
        .service
        .create_basket(
            fx.race_id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: true,
                capacity: 10,
            },
        )
        .await
        .unwrap();
    let race_basket_2 = fx
        .service
        .create_basket(
            fx.race_id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: true,
                capacity: 10,
            },
        )
        .await
        .unwrap();
    let dist_basket = fx
        .service
        .create_basket(
            fx.race_id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: false,
                capacity: 10,
            },
        )
        .await
        .unwrap();

    assert_eq!(race_basket_1.basket_no, 1);
    assert_eq!(race_basket_2.basket_no, 2);
    // Distribution baskets number independently
    assert_eq!(dist_basket.basket_no, 1);
}

#[tokio::test]
async fn basket_capacity_is_never_exceeded() {
    let fx = race_with_three_birds().await;

    let basket = fx
        .service
        .create_basket(
            fx.race_id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: true,
                capacity: 1,
            },
        )
        .await
        .unwrap();

    let assigned = fx
        .service
        .assign_to_basket(
            fx.race_id,
            AssignBasketRequest {
                id_basket: basket.id,
                rf_id: "AA110001".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(assigned.id_race_basket, Some(basket.id));
    assert!(assigned.race_basket_time.is_some());

    // The last slot is taken; the next bird is refused
    let err = fx
        .service
        .assign_to_basket(
            fx.race_id,
            AssignBasketRequest {
                id_basket: basket.id,
                rf_id: "AA110002".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CapacityExceeded(_)));

    // Re-scanning the bird already inside is a no-op, not an overflow
    let again = fx
        .service
        .assign_to_basket(
            fx.race_id,
            AssignBasketRequest {
                id_basket: basket.id,
                rf_id: "AA110001".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(again.id_race_basket, Some(basket.id));

    let occupancy = race_items::Entity::find()
        .filter(race_items::Column::IdRaceBasket.eq(basket.id))
        .count(&fx.db)
        .await
        .unwrap();
    assert_eq!(occupancy, 1);
}

#[tokio::test]
async fn baskets_cannot_vanish_under_assigned_birds() {
    let fx = race_with_three_birds().await;

    let basket = fx
        .service
        .create_basket(
            fx.race_id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: false,
                capacity: 5,
            },
        )
        .await
        .unwrap();

    let item = fx
        .service
        .assign_to_basket(
            fx.race_id,
            AssignBasketRequest {
                id_basket: basket.id,
                rf_id: "AA110001".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(item.is_dist_basketed);
    assert_eq!(item.id_dist_basket, Some(basket.id));

    let err = fx.service.delete_basket(basket.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Pull the bird back out, then the delete goes through
    fx.service
        .update_race_item(
            item.id,
            UpdateRaceItemRequest {
                is_lost: None,
                clear_baskets: Some(true),
            },
        )
        .await
        .unwrap();

    fx.service.delete_basket(basket.id).await.unwrap();
}

#[tokio::test]
async fn publishing_a_result_twice_updates_in_place() {
    let fx = race_with_three_birds().await;
    let race = fx.service.get_race(fx.race_id).await.unwrap();

    let first_arrival = race.start_time + Duration::hours(2);
    let result = fx
        .service
        .publish_result(
            fx.race_id,
            PublishResultRequest {
                rf_id: "AA110001".to_string(),
                arrival_time: Some(first_arrival),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.elapsed_seconds, 7200);
    // 120 km in 2 h = 1000 m/min
    assert_eq!(result.speed_m_per_min, Some(1000.0));

    let later_arrival = first_arrival + Duration::seconds(30);
    let updated = fx
        .service
        .publish_result(
            fx.race_id,
            PublishResultRequest {
                rf_id: "AA110001".to_string(),
                arrival_time: Some(later_arrival),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.elapsed_seconds, 7230);

    // Still exactly one result row for this bird
    assert_eq!(
        race_item_results::Entity::find().count(&fx.db).await.unwrap(),
        1
    );
    let row = race_item_results::Entity::find()
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.arrival_time.timestamp(), later_arrival.timestamp());
    assert_eq!(row.elapsed_seconds, 7230);
}

#[tokio::test]
async fn arrival_before_start_is_rejected() {
    let fx = race_with_three_birds().await;
    let race = fx.service.get_race(fx.race_id).await.unwrap();

    let err = fx
        .service
        .publish_result(
            fx.race_id,
            PublishResultRequest {
                rf_id: "AA110001".to_string(),
                arrival_time: Some(race.start_time - Duration::minutes(5)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    assert_eq!(
        race_item_results::Entity::find().count(&fx.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn race_stats_group_arrived_lost_and_missing() {
    let fx = race_with_three_birds().await;
    let race = fx.service.get_race(fx.race_id).await.unwrap();

    // Bird 1 arrives, bird 2 is declared lost, bird 3 is still out
    fx.service
        .publish_result(
            fx.race_id,
            PublishResultRequest {
                rf_id: "AA110001".to_string(),
                arrival_time: Some(race.start_time + Duration::hours(2)),
            },
        )
        .await
        .unwrap();

    let items = fx.service.list_race_items(fx.race_id).await.unwrap();
    let lost_item = items.iter().find(|i| i.id_bird == fx.bird_ids[1]).unwrap();
    fx.service
        .update_race_item(
            lost_item.id,
            UpdateRaceItemRequest {
                is_lost: Some(true),
                clear_baskets: None,
            },
        )
        .await
        .unwrap();

    let stats = fx.service.list_races(race.id_event).await.unwrap();
    assert_eq!(stats.len(), 1);
    let s = &stats[0];
    assert_eq!(s.total_birds, 3);
    assert_eq!(s.arrived, 1);
    assert_eq!(s.lost, 1);
    assert_eq!(s.not_arrived, 1);

    let results = fx.service.list_race_results(fx.race_id).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].rf_id, "AA110001");
}

#[tokio::test]
async fn assignment_requires_matching_race_and_known_rf_id() {
    let fx = race_with_three_birds().await;

    let basket = fx
        .service
        .create_basket(
            fx.race_id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: true,
                capacity: 5,
            },
        )
        .await
        .unwrap();

    let err = fx
        .service
        .assign_to_basket(
            fx.race_id,
            AssignBasketRequest {
                id_basket: basket.id,
                rf_id: "DEADBEEF".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // A basket of another race is refused
    let race = fx.service.get_race(fx.race_id).await.unwrap();
    let other_race = fx
        .service
        .create_race(
            race.id_event,
            CreateRaceRequest {
                race_type: RaceType::Training,
                name: None,
                start_time: Utc::now(),
                distance_m: None,
                weather: None,
                release_point: None,
            },
        )
        .await
        .unwrap();
    let other_basket = fx
        .service
        .create_basket(
            other_race.id,
            CreateBasketRequest {
                basket_no: None,
                is_race_basket: true,
                capacity: 5,
            },
        )
        .await
        .unwrap();

    let err = fx
        .service
        .assign_to_basket(
            fx.race_id,
            AssignBasketRequest {
                id_basket: other_basket.id,
                rf_id: "AA110001".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}
