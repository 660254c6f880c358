//! Route definitions for the GymHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The router
//! receives `AppState` and passes it to all handlers via Axum's `State`
//! extractor.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(slot_routes())
        .merge(availability_routes())
        .merge(reservation_routes())
        .merge(checkin_routes())
        .merge(payment_routes())
        .merge(directory_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Slot template CRUD and per-slot views.
fn slot_routes() -> Router<AppState> {
    Router::new()
        .route("/slots", get(handlers::slot::list_slots))
        .route("/slots", post(handlers::slot::create_slot))
        .route("/slots/{id}", get(handlers::slot::get_slot))
        .route("/slots/{id}", put(handlers::slot::update_slot))
        .route("/slots/{id}", delete(handlers::slot::deactivate_slot))
        .route(
            "/slots/{id}/checkins",
            get(handlers::slot::list_slot_checkins),
        )
}

/// Live capacity views.
fn availability_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/slots/{id}/availability",
            get(handlers::availability::slot_availability),
        )
        .route(
            "/availability/{weekday}",
            get(handlers::availability::weekday_availability),
        )
}

/// Reservation ledger operations.
fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            post(handlers::reservation::create_reservation),
        )
        .route(
            "/reservations/{id}",
            delete(handlers::reservation::release_reservation),
        )
        .route(
            "/reservations/reschedule",
            post(handlers::reservation::reschedule_reservation),
        )
        .route(
            "/subscriptions/{id}/reservations",
            get(handlers::reservation::list_subscription_reservations),
        )
        .route(
            "/members/{id}/reservations",
            get(handlers::reservation::list_member_reservations),
        )
}

/// Check-in recording and history.
fn checkin_routes() -> Router<AppState> {
    Router::new()
        .route("/checkins", post(handlers::checkin::record_checkin))
        .route(
            "/members/{id}/checkins",
            get(handlers::checkin::list_member_checkins),
        )
}

/// Payment order lifecycle and subscriptions.
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payment-orders", post(handlers::payment::create_order))
        .route("/payment-orders", get(handlers::payment::list_orders))
        .route("/payment-orders/{id}", get(handlers::payment::get_order))
        .route(
            "/payment-orders/{id}/receipt",
            post(handlers::payment::attach_receipt),
        )
        .route(
            "/payment-orders/{id}/approve",
            post(handlers::payment::approve_order),
        )
        .route(
            "/payment-orders/{id}/reject",
            post(handlers::payment::reject_order),
        )
        .route(
            "/payment-orders/expire",
            post(handlers::payment::expire_orders),
        )
        .route(
            "/members/{id}/payment-orders",
            get(handlers::payment::list_member_orders),
        )
        .route(
            "/members/{id}/subscriptions",
            get(handlers::payment::list_member_subscriptions),
        )
}

/// Read-only directories for the back office frontend.
fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(handlers::directory::list_members))
        .route("/members/{id}", get(handlers::directory::get_member))
        .route("/rooms", get(handlers::directory::list_rooms))
        .route("/plans", get(handlers::directory::list_plans))
}

/// Health probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// CORS layer from configuration. `["*"]` allows any origin.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let cors_config = &state.config.server.cors;
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(cors_config.max_age_seconds));

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin, "Ignoring unparseable CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
