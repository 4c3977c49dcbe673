use crate::entities::breeder_entity as breeders;
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthResponse, BreederResponse, LoginRequest, RefreshTokenRequest, RegisterBreederRequest,
};
use crate::utils::{JwtService, hash_password, validate_password, verify_password};
use regex::Regex;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn register(&self, request: RegisterBreederRequest) -> AppResult<AuthResponse> {
        let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
        if !email_regex.is_match(&request.email) {
            return Err(AppError::ValidationError("Invalid email".to_string()));
        }
        if request.name.trim().is_empty() || request.name.len() > 100 {
            return Err(AppError::ValidationError(
                "Name must be between 1 and 100 characters".to_string(),
            ));
        }
        validate_password(&request.password)?;

        let existing = breeders::Entity::find()
            .filter(breeders::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // Sequential breeder number
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct MaxRow {
            max_no: Option<i64>,
        }
        let max_no = breeders::Entity::find()
            .select_only()
            .column_as(Expr::col(breeders::Column::BreederNo).max(), "max_no")
            .into_model::<MaxRow>()
            .one(&self.pool)
            .await?
            .and_then(|r| r.max_no)
            .unwrap_or(0);

        let password_hash = hash_password(&request.password)?;

        let breeder = breeders::ActiveModel {
            breeder_no: Set(max_no + 1),
            name: Set(request.name),
            email: Set(request.email),
            password_hash: Set(password_hash),
            is_admin: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        self.issue_tokens(breeder)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let breeder = breeders::Entity::find()
            .filter(breeders::Column::Email.eq(request.email.clone()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &breeder.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        self.issue_tokens(breeder)
    }

    pub async fn refresh(&self, request: RefreshTokenRequest) -> AppResult<AuthResponse> {
        let claims = self
            .jwt_service
            .verify_refresh_token(&request.refresh_token)?;
        let breeder_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let breeder = breeders::Entity::find_by_id(breeder_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Breeder not found".to_string()))?;

        self.issue_tokens(breeder)
    }

    fn issue_tokens(&self, breeder: breeders::Model) -> AppResult<AuthResponse> {
        let access_token = self.jwt_service.generate_access_token(
            breeder.id,
            breeder.breeder_no,
            breeder.is_admin,
        )?;
        let refresh_token = self.jwt_service.generate_refresh_token(
            breeder.id,
            breeder.breeder_no,
            breeder.is_admin,
        )?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
            breeder: BreederResponse::from(breeder),
        })
    }
}
