use crate::error::AppError;
use crate::middlewares::AuthContext;
use crate::models::*;
use crate::services::EventService;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn admin_ctx(req: &HttpRequest) -> Result<AuthContext, AppError> {
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
    path = "/fee-schemes",
    tag = "events",
    request_body = CreateFeeSchemeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fee scheme created", body = FeeSchemeResponse),
        (status = 400, description = "Perch fee table does not match max_bird_count"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_fee_scheme(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    request: web::Json<CreateFeeSchemeRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_ctx(&req) {
        return Ok(e.error_response());
    }

    match event_service.create_fee_scheme(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/fee-schemes/{scheme_id}",
    tag = "events",
    params(("scheme_id" = i64, Path, description = "Fee scheme id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fee scheme", body = FeeSchemeResponse),
        (status = 404, description = "Fee scheme not found")
    )
)]
pub async fn get_fee_scheme(
    event_service: web::Data<EventService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match event_service.get_fee_scheme(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event created", body = EventResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Fee scheme not found")
    )
)]
pub async fn create_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_ctx(&req) {
        return Ok(e.error_response());
    }

    match event_service.create_event(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events",
    tag = "events",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("page_size" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Events")
    )
)]
pub async fn list_events(
    event_service: web::Data<EventService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match event_service.list_events(&query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/events/{event_id}",
    tag = "events",
    params(("event_id" = i64, Path, description = "Event id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event with fee and prize schemes", body = EventDetailResponse),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    event_service: web::Data<EventService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match event_service.get_event_detail(path.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/events/{event_id}",
    tag = "events",
    params(("event_id" = i64, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn update_event(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateEventRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_ctx(&req) {
        return Ok(e.error_response());
    }

    match event_service
        .update_event(path.into_inner(), request.into_inner())
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
    path = "/events/{event_id}/prize-schemes",
    tag = "events",
    params(("event_id" = i64, Path, description = "Event id")),
    request_body = CreatePrizeSchemeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prize scheme attached", body = PrizeSchemeResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn add_prize_scheme(
    event_service: web::Data<EventService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreatePrizeSchemeRequest>,
) -> Result<HttpResponse> {
    if let Err(e) = admin_ctx(&req) {
        return Ok(e.error_response());
    }

    match event_service
        .add_prize_scheme(path.into_inner(), request.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn event_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fee-schemes")
            .route("", web::post().to(create_fee_scheme))
            .route("/{scheme_id}", web::get().to(get_fee_scheme)),
    )
    .service(
        web::scope("/events")
            .route("", web::post().to(create_event))
            .route("", web::get().to(list_events))
            .route("/{event_id}", web::get().to(get_event))
            .route("/{event_id}", web::put().to(update_event))
            .route("/{event_id}/prize-schemes", web::post().to(add_prize_scheme)),
    );
}
