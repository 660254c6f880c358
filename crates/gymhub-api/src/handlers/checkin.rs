//! Check-in handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use gymhub_entity::checkin::CheckIn;

use crate::dto::request::CreateCheckInRequest;
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// POST /api/checkins
pub async fn record_checkin(
    State(state): State<AppState>,
    Json(req): Json<CreateCheckInRequest>,
) -> Result<Json<ApiResponse<CheckIn>>, ApiError> {
    let checkin = state
        .checkin_service
        .record(req.member_id, req.slot_template_id, req.origin)
        .await?;
    Ok(Json(ApiResponse::ok(checkin)))
}

/// GET /api/members/{id}/checkins
pub async fn list_member_checkins(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<CheckIn>>>, ApiError> {
    let page = state
        .checkin_service
        .list_for_member(id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}
