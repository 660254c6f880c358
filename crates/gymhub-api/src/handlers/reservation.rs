//! Reservation handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use gymhub_entity::reservation::Reservation;

use crate::dto::request::{CreateReservationRequest, RescheduleRequest};
use crate::dto::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// POST /api/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .reservation_service
        .reserve(req.subscription_id, req.slot_template_id)
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// DELETE /api/reservations/{id}
pub async fn release_reservation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.reservation_service.release(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Reservation released".to_string(),
    })))
}

/// POST /api/reservations/reschedule
pub async fn reschedule_reservation(
    State(state): State<AppState>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<ApiResponse<Reservation>>, ApiError> {
    let reservation = state
        .reservation_service
        .reschedule(
            req.subscription_id,
            req.old_slot_template_id,
            req.new_slot_template_id,
        )
        .await?;
    Ok(Json(ApiResponse::ok(reservation)))
}

/// GET /api/subscriptions/{id}/reservations
pub async fn list_subscription_reservations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Reservation>>>, ApiError> {
    let reservations = state.reservation_service.list_for_subscription(id).await?;
    Ok(Json(ApiResponse::ok(reservations)))
}

/// GET /api/members/{id}/reservations
pub async fn list_member_reservations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Reservation>>>, ApiError> {
    let page = state
        .reservation_service
        .list_for_member(id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}
