use crate::common;
use derby_backend::entities::{
    PaymentStatus, event_inventory_entity as inventories,
    event_inventory_item_entity as inventory_items, payment_entity as payments,
};
use derby_backend::error::AppError;
use derby_backend::models::RegisterRequest;
use derby_backend::services::{PaymentService, RegistrationService};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

/// Registers one bird against a mocked gateway and returns the order id.
async fn registered_order(
    db: &sea_orm::DatabaseConnection,
    server: &mut mockito::ServerGuard,
    breeder_id: i64,
    order_id: &str,
) -> String {
    let scheme = common::create_fee_scheme(db, 0, 2, 0, &[500, 750]).await;
    let event = common::create_event(db, scheme.id, true).await;
    let bird = common::create_bird(db, breeder_id, "AA110001").await;

    let _token = server
        .mock("POST", "/v1/oauth2/token")
        .with_status(200)
        .with_body(common::TOKEN_BODY)
        .expect_at_least(1)
        .create_async()
        .await;
    let _order = server
        .mock("POST", "/v2/checkout/orders")
        .with_status(201)
        .with_body(common::order_body(order_id))
        .create_async()
        .await;

    let service = RegistrationService::new(db.clone(), common::paypal_service(&server.url()));
    let response = service
        .register(
            breeder_id,
            RegisterRequest {
                id_event: event.id,
                bird_ids: vec![bird.id],
            },
        )
        .await
        .expect("registration should succeed");

    response.order_id
}

#[tokio::test]
async fn capture_completed_marks_payment_captured() {
    let db = common::setup_db().await;
    let mut server = mockito::Server::new_async().await;

    let breeder = common::create_breeder(&db, 1, "a@derby.test").await;
    let order_id = registered_order(&db, &mut server, breeder.id, "ORDER-1").await;

    let capture_mock = server
        .mock("POST", "/v2/checkout/orders/ORDER-1/capture")
        .with_status(201)
        .with_body(common::capture_body("ORDER-1", "COMPLETED", "CAP-1"))
        .expect(1)
        .create_async()
        .await;

    let service = PaymentService::new(db.clone(), common::paypal_service(&server.url()));

    let settled = service.capture(&order_id).await.unwrap();
    assert_eq!(settled.status, PaymentStatus::Captured);
    assert_eq!(settled.capture_id.as_deref(), Some("CAP-1"));

    // Second capture is a local no-op: same outcome, no new gateway call
    let again = service.capture(&order_id).await.unwrap();
    assert_eq!(again.status, PaymentStatus::Captured);
    assert_eq!(again.capture_id.as_deref(), Some("CAP-1"));
    capture_mock.assert_async().await;

    let payment = payments::Entity::find()
        .filter(payments::Column::OrderId.eq("ORDER-1"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Captured);
    assert_eq!(payment.capture_id.as_deref(), Some("CAP-1"));
}

#[tokio::test]
async fn capture_pending_moves_to_pending_confirmation() {
    let db = common::setup_db().await;
    let mut server = mockito::Server::new_async().await;

    let breeder = common::create_breeder(&db, 1, "a@derby.test").await;
    let order_id = registered_order(&db, &mut server, breeder.id, "ORDER-2").await;

    let _capture = server
        .mock("POST", "/v2/checkout/orders/ORDER-2/capture")
        .with_status(201)
        .with_body(common::capture_body("ORDER-2", "PENDING", "CAP-2"))
        .create_async()
        .await;

    let service = PaymentService::new(db.clone(), common::paypal_service(&server.url()));

    let settled = service.capture(&order_id).await.unwrap();
    assert_eq!(settled.status, PaymentStatus::PendingConfirmation);
}

#[tokio::test]
async fn failed_capture_keeps_the_reservation() {
    let db = common::setup_db().await;
    let mut server = mockito::Server::new_async().await;

    let breeder = common::create_breeder(&db, 1, "a@derby.test").await;
    let order_id = registered_order(&db, &mut server, breeder.id, "ORDER-3").await;

    let _capture = server
        .mock("POST", "/v2/checkout/orders/ORDER-3/capture")
        .with_status(201)
        .with_body(common::capture_body("ORDER-3", "DECLINED", "CAP-3"))
        .create_async()
        .await;

    let service = PaymentService::new(db.clone(), common::paypal_service(&server.url()));

    let err = service.capture(&order_id).await.unwrap_err();
    assert!(matches!(err, AppError::ExternalServiceError(_)));

    // Payment marked failed, reservation left intact
    let payment = payments::Entity::find()
        .filter(payments::Column::OrderId.eq("ORDER-3"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert_eq!(inventories::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(
        inventory_items::Entity::find().count(&db).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn capture_of_unknown_order_is_not_found() {
    let db = common::setup_db().await;
    let server = mockito::Server::new_async().await;

    let service = PaymentService::new(db.clone(), common::paypal_service(&server.url()));

    let err = service.capture("NO-SUCH-ORDER").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn cancel_releases_reservation_children_first() {
    let db = common::setup_db().await;
    let mut server = mockito::Server::new_async().await;

    let breeder = common::create_breeder(&db, 1, "a@derby.test").await;
    let order_id = registered_order(&db, &mut server, breeder.id, "ORDER-4").await;

    let service = PaymentService::new(db.clone(), common::paypal_service(&server.url()));

    service.cancel(&order_id, breeder.id).await.unwrap();

    assert_eq!(payments::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(inventories::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(
        inventory_items::Entity::find().count(&db).await.unwrap(),
        0
    );

    // Second cancel: the payment row no longer exists
    let err = service.cancel(&order_id, breeder.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn cancel_is_owner_only_and_pending_only() {
    let db = common::setup_db().await;
    let mut server = mockito::Server::new_async().await;

    let breeder = common::create_breeder(&db, 1, "a@derby.test").await;
    let other = common::create_breeder(&db, 2, "b@derby.test").await;
    let order_id = registered_order(&db, &mut server, breeder.id, "ORDER-5").await;

    let service = PaymentService::new(db.clone(), common::paypal_service(&server.url()));

    let err = service.cancel(&order_id, other.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    let _capture = server
        .mock("POST", "/v2/checkout/orders/ORDER-5/capture")
        .with_status(201)
        .with_body(common::capture_body("ORDER-5", "COMPLETED", "CAP-5"))
        .create_async()
        .await;
    service.capture(&order_id).await.unwrap();

    // Captured payments cannot be cancelled
    let err = service.cancel(&order_id, breeder.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(inventories::Entity::find().count(&db).await.unwrap(), 1);
}
