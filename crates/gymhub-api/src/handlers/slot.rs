//! Slot template handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use gymhub_entity::checkin::CheckIn;
use gymhub_entity::slot::model::{CreateSlotTemplate, UpdateSlotTemplate};
use gymhub_entity::slot::SlotTemplate;

use crate::dto::request::{validated, CreateSlotRequest, UpdateSlotRequest};
use crate::dto::response::{ApiResponse, MessageResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// GET /api/slots
pub async fn list_slots(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SlotTemplate>>>, ApiError> {
    let slots = state.schedule_service.list_active().await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// POST /api/slots
pub async fn create_slot(
    State(state): State<AppState>,
    Json(req): Json<CreateSlotRequest>,
) -> Result<Json<ApiResponse<SlotTemplate>>, ApiError> {
    let req = validated(req)?;
    let slot = state
        .schedule_service
        .create_slot(CreateSlotTemplate {
            room_id: req.room_id,
            instructor_id: req.instructor_id,
            weekday: req.weekday,
            start_time: req.start_time,
            duration_minutes: req.duration_minutes,
            capacity: req.capacity,
        })
        .await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// GET /api/slots/{id}
pub async fn get_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SlotTemplate>>, ApiError> {
    let slot = state.schedule_service.get_slot(id).await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// PUT /api/slots/{id}
pub async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSlotRequest>,
) -> Result<Json<ApiResponse<SlotTemplate>>, ApiError> {
    let req = validated(req)?;
    let slot = state
        .schedule_service
        .update_slot(UpdateSlotTemplate {
            id,
            instructor_id: req.instructor_id,
            weekday: req.weekday,
            start_time: req.start_time,
            duration_minutes: req.duration_minutes,
            capacity: req.capacity,
        })
        .await?;
    Ok(Json(ApiResponse::ok(slot)))
}

/// DELETE /api/slots/{id}
pub async fn deactivate_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.schedule_service.deactivate_slot(id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Slot template deactivated".to_string(),
    })))
}

/// GET /api/slots/{id}/checkins
pub async fn list_slot_checkins(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<CheckIn>>>, ApiError> {
    let page = state
        .checkin_service
        .list_for_slot(id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}
