//! Member, room, and plan directory handlers (read-only).

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use gymhub_entity::member::Member;
use gymhub_entity::plan::Plan;
use gymhub_entity::room::Room;

use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// GET /api/members
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Member>>>, ApiError> {
    let page = state
        .directory_service
        .list_members(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Member>>, ApiError> {
    let member = state.directory_service.get_member(id).await?;
    Ok(Json(ApiResponse::ok(member)))
}

/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Room>>>, ApiError> {
    let page = state
        .directory_service
        .list_rooms(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Plan>>>, ApiError> {
    let page = state
        .directory_service
        .list_plans(&params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}
