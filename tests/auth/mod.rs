use crate::common;
use derby_backend::error::AppError;
use derby_backend::models::{LoginRequest, RegisterBreederRequest};
use derby_backend::services::AuthService;
use derby_backend::utils::JwtService;

fn auth_service(db: &sea_orm::DatabaseConnection) -> AuthService {
    AuthService::new(db.clone(), JwtService::new("test-secret", 3600, 86400))
}

#[tokio::test]
async fn register_assigns_sequential_breeder_numbers() {
    let db = common::setup_db().await;
    let service = auth_service(&db);

    let first = service
        .register(RegisterBreederRequest {
            name: "Ana".to_string(),
            email: "ana@derby.test".to_string(),
            password: "Password123".to_string(),
        })
        .await
        .unwrap();
    let second = service
        .register(RegisterBreederRequest {
            name: "Boro".to_string(),
            email: "boro@derby.test".to_string(),
            password: "Password123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(first.breeder.breeder_no, 1);
    assert_eq!(second.breeder.breeder_no, 2);
    assert!(!first.access_token.is_empty());

    // Duplicate email is refused
    let err = service
        .register(RegisterBreederRequest {
            name: "Ana again".to_string(),
            email: "ana@derby.test".to_string(),
            password: "Password123".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn login_checks_the_password() {
    let db = common::setup_db().await;
    let service = auth_service(&db);

    service
        .register(RegisterBreederRequest {
            name: "Ana".to_string(),
            email: "ana@derby.test".to_string(),
            password: "Password123".to_string(),
        })
        .await
        .unwrap();

    let ok = service
        .login(LoginRequest {
            email: "ana@derby.test".to_string(),
            password: "Password123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(ok.breeder.email, "ana@derby.test");

    let err = service
        .login(LoginRequest {
            email: "ana@derby.test".to_string(),
            password: "WrongPassword1".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthError(_)));
}
