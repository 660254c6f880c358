//! Payment order repository.
//!
//! State transitions are guarded updates: `UPDATE ... WHERE status = ANY(from)
//! RETURNING`. A `None` result means the order moved concurrently (or never
//! was in an allowed state) and the caller decides how to report it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::payment::model::CreatePaymentOrder;
use gymhub_entity::payment::{PaymentOrder, PaymentOrderStatus};

use crate::stores::PaymentOrderStore;

/// Repository for payment orders.
#[derive(Debug, Clone)]
pub struct PaymentOrderRepository {
    pool: PgPool,
}

impl PaymentOrderRepository {
    /// Create a new payment order repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn status_names(statuses: &[PaymentOrderStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl PaymentOrderStore for PaymentOrderRepository {
    async fn insert(&self, data: &CreatePaymentOrder) -> AppResult<PaymentOrder> {
        sqlx::query_as::<_, PaymentOrder>(
            "INSERT INTO payment_orders (member_id, plan_id, amount_cents, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.member_id)
        .bind(data.plan_id)
        .bind(data.amount_cents)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create payment order", e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentOrder>> {
        sqlx::query_as::<_, PaymentOrder>("SELECT * FROM payment_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find payment order", e)
            })
    }

    async fn attach_receipt(
        &self,
        id: Uuid,
        receipt_path: &str,
        from: &[PaymentOrderStatus],
    ) -> AppResult<Option<PaymentOrder>> {
        sqlx::query_as::<_, PaymentOrder>(
            "UPDATE payment_orders \
             SET receipt_path = $2, status = 'en_revision' \
             WHERE id = $1 AND status = ANY($3::payment_order_status[]) \
             RETURNING *",
        )
        .bind(id)
        .bind(receipt_path)
        .bind(status_names(from))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to attach receipt", e))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[PaymentOrderStatus],
        to: PaymentOrderStatus,
        notes: Option<&str>,
        resolved_at: DateTime<Utc>,
    ) -> AppResult<Option<PaymentOrder>> {
        sqlx::query_as::<_, PaymentOrder>(
            "UPDATE payment_orders \
             SET status = $2::payment_order_status, \
                 resolution_notes = COALESCE($4, resolution_notes), \
                 resolved_at = $5 \
             WHERE id = $1 AND status = ANY($3::payment_order_status[]) \
             RETURNING *",
        )
        .bind(id)
        .bind(to.as_str())
        .bind(status_names(from))
        .bind(notes)
        .bind(resolved_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition payment order", e)
        })
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE payment_orders \
             SET status = 'expirado', resolved_at = $1 \
             WHERE status IN ('pendiente', 'en_revision') AND expires_at < $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to expire payment orders", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payment_orders WHERE member_id = $1")
                .bind(member_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count payment orders", e)
                })?;

        let orders = sqlx::query_as::<_, PaymentOrder>(
            "SELECT * FROM payment_orders WHERE member_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(member_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list payment orders", e)
        })?;

        Ok(PageResponse::new(
            orders,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_by_status(
        &self,
        status: PaymentOrderStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM payment_orders WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count payment orders", e)
                })?;

        let orders = sqlx::query_as::<_, PaymentOrder>(
            "SELECT * FROM payment_orders WHERE status = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list payment orders", e)
        })?;

        Ok(PageResponse::new(
            orders,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
