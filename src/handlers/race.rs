use crate::error::AppError;
use crate::middlewares::AuthContext;
use crate::models::*;
use crate::services::RaceService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// Race-day operations are staff-only.
fn staff_ctx(req: &HttpRequest) -> Result<AuthContext, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing authentication".to_string()))?;
    if !ctx.is_admin {
        return Err(AppError::Forbidden);
    }
    Ok(ctx)
}

#[utoipa::path(
    post,
    path = "/races/event/{event_id}",
    tag = "races",
    params(("event_id" = i64, Path, description = "Event id")),
    request_body = CreateRaceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Race created with its race items", body = RaceResponse),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn create_race(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateRaceRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service
        .create_race(path.into_inner(), request.into_inner())
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
    path = "/races/event/{event_id}",
    tag = "races",
    params(("event_id" = i64, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Races of the event with per-race statistics")
    )
)]
pub async fn list_races(
    race_service: web::Data<RaceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match race_service.list_races(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/races/{race_id}/items",
    tag = "races",
    params(("race_id" = i64, Path, description = "Race id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Race items")
    )
)]
pub async fn list_race_items(
    race_service: web::Data<RaceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match race_service.list_race_items(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/races/items/{race_item_id}",
    tag = "races",
    params(("race_item_id" = i64, Path, description = "Race item id")),
    request_body = UpdateRaceItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Race item updated", body = RaceItemResponse),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Race item not found")
    )
)]
pub async fn update_race_item(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateRaceItemRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service
        .update_race_item(path.into_inner(), request.into_inner())
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
    path = "/races/{race_id}/baskets",
    tag = "baskets",
    params(("race_id" = i64, Path, description = "Race id")),
    request_body = CreateBasketRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Basket created", body = BasketResponse),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Race not found")
    )
)]
pub async fn create_basket(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreateBasketRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service
        .create_basket(path.into_inner(), request.into_inner())
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
    path = "/races/{race_id}/baskets",
    tag = "baskets",
    params(("race_id" = i64, Path, description = "Race id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Baskets with current occupancy")
    )
)]
pub async fn list_baskets(
    race_service: web::Data<RaceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match race_service.list_baskets(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/races/baskets/{basket_id}",
    tag = "baskets",
    params(("basket_id" = i64, Path, description = "Basket id")),
    request_body = UpdateBasketRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Basket updated", body = BasketResponse),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Capacity below current occupancy")
    )
)]
pub async fn update_basket(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateBasketRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service
        .update_basket(path.into_inner(), request.into_inner())
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
    delete,
    path = "/races/baskets/{basket_id}",
    tag = "baskets",
    params(("basket_id" = i64, Path, description = "Basket id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Basket deleted"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Basket still holds birds")
    )
)]
pub async fn delete_basket(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service.delete_basket(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Basket deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/races/{race_id}/assign",
    tag = "baskets",
    params(("race_id" = i64, Path, description = "Race id")),
    request_body = AssignBasketRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bird placed into the basket", body = RaceItemResponse),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Bird, race item or basket not found"),
        (status = 409, description = "Basket is full")
    )
)]
pub async fn assign_to_basket(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<AssignBasketRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service
        .assign_to_basket(path.into_inner(), request.into_inner())
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
    path = "/races/{race_id}/results",
    tag = "results",
    params(("race_id" = i64, Path, description = "Race id")),
    request_body = PublishResultRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Arrival recorded", body = RaceResultResponse),
        (status = 400, description = "Arrival precedes race start"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Bird or race item not found")
    )
)]
pub async fn publish_result(
    race_service: web::Data<RaceService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<PublishResultRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = staff_ctx(&req) {
        return Ok(e.error_response());
    }

    match race_service
        .publish_result(path.into_inner(), request.into_inner())
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
    path = "/races/{race_id}/results",
    tag = "results",
    params(("race_id" = i64, Path, description = "Race id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Results ordered by arrival"),
        (status = 404, description = "Race not found")
    )
)]
pub async fn list_race_results(
    race_service: web::Data<RaceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match race_service.list_race_results(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn race_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/races")
            .route("/event/{event_id}", web::post().to(create_race))
            .route("/event/{event_id}", web::get().to(list_races))
            .route("/items/{race_item_id}", web::put().to(update_race_item))
            .route("/baskets/{basket_id}", web::put().to(update_basket))
            .route("/baskets/{basket_id}", web::delete().to(delete_basket))
            .route("/{race_id}/items", web::get().to(list_race_items))
            .route("/{race_id}/baskets", web::post().to(create_basket))
            .route("/{race_id}/baskets", web::get().to(list_baskets))
            .route("/{race_id}/assign", web::post().to(assign_to_basket))
            .route("/{race_id}/results", web::post().to(publish_result))
            .route("/{race_id}/results", web::get().to(list_race_results)),
    );
}
