//! Live availability handlers for calendar rendering.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use gymhub_entity::slot::Weekday;
use gymhub_service::SlotAvailability;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/slots/{id}/availability
pub async fn slot_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SlotAvailability>>, ApiError> {
    let availability = state.capacity_service.availability(id).await?;
    Ok(Json(ApiResponse::ok(availability)))
}

/// GET /api/availability/{weekday}
///
/// The weekday accepts a name (`monday`) or an index (`1`).
pub async fn weekday_availability(
    State(state): State<AppState>,
    Path(weekday): Path<String>,
) -> Result<Json<ApiResponse<Vec<SlotAvailability>>>, ApiError> {
    let weekday: Weekday = weekday.parse()?;
    let availability = state
        .capacity_service
        .availability_for_weekday(weekday)
        .await?;
    Ok(Json(ApiResponse::ok(availability)))
}
