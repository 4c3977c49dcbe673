use crate::error::AppError;
use crate::middlewares::AuthContext;
use crate::models::*;
use crate::services::PaymentService;
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
    path = "/payments/capture",
    tag = "payments",
    request_body = CapturePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Settlement outcome", body = SettlementResponse),
        (status = 404, description = "Payment not found"),
        (status = 502, description = "Gateway capture failed")
    )
)]
pub async fn capture_payment(
    payment_service: web::Data<PaymentService>,
    request: web::Json<CapturePaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service.capture(&request.order_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/payments/cancel",
    tag = "payments",
    request_body = CancelPaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment cancelled, reservation released"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment is not pending")
    )
)]
pub async fn cancel_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<CancelPaymentRequest>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match payment_service
        .cancel(&request.order_id, ctx.breeder_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Payment cancelled"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    params(
        ("page" = Option<u32>, Query, description = "Page number"),
        ("per_page" = Option<u32>, Query, description = "Page size")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's payments")
    )
)]
pub async fn get_my_payments(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse> {
    let ctx = match auth_ctx(&req) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(e.error_response()),
    };

    match payment_service.get_my_payments(ctx.breeder_id, &query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::get().to(get_my_payments))
            .route("/capture", web::post().to(capture_payment))
            .route("/cancel", web::post().to(cancel_payment)),
    );
}
