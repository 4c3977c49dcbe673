use crate::error::AppError;
use crate::middlewares::AuthContext;
use crate::models::*;
use crate::services::RegistrationService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn auth_ctx(req: &HttpRequest) -> Result<AuthContext, AppError> {
    req.extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication".to_string()))
}

#[utoipa::path(
    post,
    path = "/registrations",
    tag = "registrations",
    request_body = RegisterRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reservation created, gateway order opened", body = RegisterResponse),
        (status = 400, description = "Invalid bird list"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Event closed or too many birds"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn register(
    registration_service: web::Data<RegistrationService>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match registration_service
        .register(ctx.breeder_id, request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/registrations",
    tag = "registrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's reservations with their items")
    )
)]
pub async fn list_my_inventories(
    registration_service: web::Data<RegistrationService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match registration_service
        .list_my_inventories(ctx.breeder_id)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/registrations/{inventory_id}/payment-order",
    tag = "registrations",
    params(("inventory_id" = i64, Path, description = "Reservation id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New gateway order opened", body = RegisterResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Payment no longer pending")
    )
)]
pub async fn create_payment_order(
    registration_service: web::Data<RegistrationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match registration_service
        .create_payment_order(ctx.breeder_id, path.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn registration_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/registrations")
            .route("", web::post().to(register))
            .route("", web::get().to(list_my_inventories))
            .route(
                "/{inventory_id}/payment-order",
                web::post().to(create_payment_order),
            ),
    );
}
