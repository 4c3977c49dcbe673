use crate::error::AppError;
use crate::middlewares::AuthContext;
use crate::models::*;
use crate::services::BirdService;
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
    path = "/birds",
    tag = "birds",
    request_body = CreateBirdRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bird created", body = BirdResponse),
        (status = 400, description = "Invalid band or RF-ID"),
        (status = 409, description = "RF-ID already in use")
    )
)]
pub async fn create_bird(
    bird_service: web::Data<BirdService>,
    req: HttpRequest,
    request: web::Json<CreateBirdRequest>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match bird_service
        .create_bird(ctx.breeder_id, request.into_inner())
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
    path = "/birds",
    tag = "birds",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size"),
        ("active_only" = Option<bool>, Query, description = "Only active birds")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bird inventory")
    )
)]
pub async fn list_birds(
    bird_service: web::Data<BirdService>,
    req: HttpRequest,
    query: web::Query<BirdQuery>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match bird_service.list_birds(ctx.breeder_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/birds/{bird_id}",
    tag = "birds",
    params(("bird_id" = i64, Path, description = "Bird id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bird", body = BirdResponse),
        (status = 404, description = "Bird not found")
    )
)]
pub async fn get_bird(
    bird_service: web::Data<BirdService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match bird_service.get_bird(ctx.breeder_id, path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/birds/{bird_id}",
    tag = "birds",
    params(("bird_id" = i64, Path, description = "Bird id")),
    request_body = UpdateBirdRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bird updated", body = BirdResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Bird not found")
    )
)]
pub async fn update_bird(
    bird_service: web::Data<BirdService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateBirdRequest>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match bird_service
        .update_bird(ctx.breeder_id, path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bird_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/birds")
            .route("", web::post().to(create_bird))
            .route("", web::get().to(list_birds))
            .route("/{bird_id}", web::get().to(get_bird))
            .route("/{bird_id}", web::put().to(update_bird)),
    );
}
