use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{PaymentStatus, RaceType};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::bird::create_bird,
        handlers::bird::list_birds,
        handlers::bird::get_bird,
        handlers::bird::update_bird,
        handlers::event::create_fee_scheme,
        handlers::event::get_fee_scheme,
        handlers::event::create_event,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::event::update_event,
        handlers::event::add_prize_scheme,
        handlers::registration::register,
        handlers::registration::list_my_inventories,
        handlers::registration::create_payment_order,
        handlers::payment::capture_payment,
        handlers::payment::cancel_payment,
        handlers::payment::get_my_payments,
        handlers::race::create_race,
        handlers::race::list_races,
        handlers::race::list_race_items,
        handlers::race::update_race_item,
        handlers::race::create_basket,
        handlers::race::list_baskets,
        handlers::race::update_basket,
        handlers::race::delete_basket,
        handlers::race::assign_to_basket,
        handlers::race::publish_result,
        handlers::race::list_race_results,
    ),
    components(
        schemas(
            RegisterBreederRequest,
            LoginRequest,
            RefreshTokenRequest,
            AuthResponse,
            BreederResponse,
            CreateBirdRequest,
            UpdateBirdRequest,
            BirdResponse,
            CreateFeeSchemeRequest,
            FeeSchemeResponse,
            CreateEventRequest,
            UpdateEventRequest,
            CreatePrizeSchemeRequest,
            PrizeSchemeResponse,
            EventResponse,
            EventDetailResponse,
            RegisterRequest,
            RegisterResponse,
            InventoryItemResponse,
            InventoryResponse,
            CapturePaymentRequest,
            CancelPaymentRequest,
            SettlementResponse,
            PaymentResponse,
            CreateRaceRequest,
            RaceResponse,
            RaceStatsResponse,
            CreateBasketRequest,
            UpdateBasketRequest,
            BasketResponse,
            AssignBasketRequest,
            UpdateRaceItemRequest,
            RaceItemResponse,
            PublishResultRequest,
            RaceResultResponse,
            PaymentStatus,
            RaceType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Breeder authentication"),
        (name = "birds", description = "Bird inventory"),
        (name = "events", description = "Events, fee and prize schemes"),
        (name = "registrations", description = "Event registration and gateway orders"),
        (name = "payments", description = "Payment capture and cancellation"),
        (name = "races", description = "Races and race items"),
        (name = "baskets", description = "Race-day basket logistics"),
        (name = "results", description = "Arrival results"),
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
