//! Payment order handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use gymhub_core::error::AppError;
use gymhub_core::types::pagination::PageRequest;
use gymhub_entity::payment::{PaymentOrder, PaymentOrderStatus};
use gymhub_entity::subscription::Subscription;

use crate::dto::request::{
    validated, ApproveOrderRequest, CreatePaymentOrderRequest, RejectOrderRequest,
};
use crate::dto::response::{ApiResponse, CountResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::PaginationParams;
use crate::state::AppState;

/// POST /api/payment-orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreatePaymentOrderRequest>,
) -> Result<Json<ApiResponse<PaymentOrder>>, ApiError> {
    let order = state
        .payment_service
        .create_order(req.member_id, req.plan_id)
        .await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// GET /api/payment-orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PaymentOrder>>, ApiError> {
    let order = state.payment_service.get_order(id).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// Review queue query: state filter plus pagination.
#[derive(Debug, Deserialize)]
pub struct OrderQueueParams {
    /// Order state to list.
    pub status: PaymentOrderStatus,
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    25
}

/// GET /api/payment-orders?status=en_revision
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderQueueParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<PaymentOrder>>>, ApiError> {
    let page = state
        .payment_service
        .list_by_status(params.status, &PageRequest::new(params.page, params.per_page))
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// POST /api/payment-orders/{id}/receipt (multipart)
pub async fn attach_receipt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<PaymentOrder>>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart payload: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;

        let order = state.payment_service.attach_receipt(id, data, &filename).await?;
        return Ok(Json(ApiResponse::ok(order)));
    }

    Err(AppError::validation("No file field in multipart payload").into())
}

/// POST /api/payment-orders/{id}/approve
pub async fn approve_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveOrderRequest>,
) -> Result<Json<ApiResponse<ApprovalResponse>>, ApiError> {
    let req = validated(req)?;
    let (order, subscription) = state.payment_service.approve(id, req.days).await?;
    Ok(Json(ApiResponse::ok(ApprovalResponse {
        order,
        subscription,
    })))
}

/// An approved order together with the subscription it granted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApprovalResponse {
    /// The verified order.
    pub order: PaymentOrder,
    /// The created or extended subscription.
    pub subscription: Subscription,
}

/// POST /api/payment-orders/{id}/reject
pub async fn reject_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectOrderRequest>,
) -> Result<Json<ApiResponse<PaymentOrder>>, ApiError> {
    let order = state.payment_service.reject(id, req.notes).await?;
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/payment-orders/expire
pub async fn expire_orders(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.payment_service.expire_overdue().await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/members/{id}/payment-orders
pub async fn list_member_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<PaymentOrder>>>, ApiError> {
    let page = state
        .payment_service
        .list_for_member(id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}

/// GET /api/members/{id}/subscriptions
pub async fn list_member_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Subscription>>>, ApiError> {
    let page = state
        .payment_service
        .list_subscriptions_for_member(id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.into())))
}
