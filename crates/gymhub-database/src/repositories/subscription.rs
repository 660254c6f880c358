//! Subscription repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::subscription::model::CreateSubscription;
use gymhub_entity::subscription::Subscription;

use crate::stores::SubscriptionStore;

/// Repository for member subscriptions.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn insert(&self, data: &CreateSubscription) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "INSERT INTO subscriptions \
                 (member_id, plan_id, payment_order_id, starts_at, ends_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.member_id)
        .bind(data.plan_id)
        .bind(data.payment_order_id)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create subscription", e)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find subscription", e)
            })
    }

    async fn find_latest_active(
        &self,
        member_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions \
             WHERE member_id = $1 AND plan_id = $2 AND active \
             ORDER BY ends_at DESC LIMIT 1",
        )
        .bind(member_id)
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find subscription", e)
        })
    }

    async fn extend(&self, id: Uuid, new_end: DateTime<Utc>) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET ends_at = $2, active = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_end)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to extend subscription", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Subscription {id} not found")))
    }

    async fn cancel_for_member_plan(&self, member_id: Uuid, plan_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE subscriptions SET active = FALSE \
             WHERE member_id = $1 AND plan_id = $2 AND active",
        )
        .bind(member_id)
        .bind(plan_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cancel subscriptions", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Subscription>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE member_id = $1")
                .bind(member_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count subscriptions", e)
                })?;

        let subscriptions = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE member_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(member_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subscriptions", e)
        })?;

        Ok(PageResponse::new(
            subscriptions,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
