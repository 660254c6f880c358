//! Reservation ledger repository.
//!
//! Remaining capacity is derived, never stored: a slot's occupancy is the
//! count of reservations held by subscriptions current at the time of the
//! query. The capacity-guarded insert serializes per slot with an advisory
//! lock so the count and the insert see the same ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::reservation::Reservation;

use crate::stores::ReservationStore;

const CURRENT_COUNT_FOR_SLOT: &str = "SELECT COUNT(*) FROM reservations r \
     JOIN subscriptions s ON s.id = r.subscription_id \
     WHERE r.slot_template_id = $1 AND s.active \
       AND s.starts_at <= $2 AND s.ends_at >= $2";

/// Repository for the reservation ledger.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    async fn insert_if_capacity(
        &self,
        subscription_id: Uuid,
        slot_template_id: Uuid,
        capacity: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Reservation>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("reservation:{slot_template_id}"))
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to take capacity lock", e)
            })?;

        let reservation = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (subscription_id, slot_template_id) \
             SELECT $1, $2 \
             WHERE (SELECT COUNT(*) FROM reservations r \
                    JOIN subscriptions s ON s.id = r.subscription_id \
                    WHERE r.slot_template_id = $2 AND s.active \
                      AND s.starts_at <= $4 AND s.ends_at >= $4) < $3 \
             RETURNING *",
        )
        .bind(subscription_id)
        .bind(slot_template_id)
        .bind(capacity)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create reservation", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit reservation", e)
        })?;

        Ok(reservation)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
            })
    }

    async fn find_for_subscription_slot(
        &self,
        subscription_id: Uuid,
        slot_template_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE subscription_id = $1 AND slot_template_id = $2",
        )
        .bind(subscription_id)
        .bind(slot_template_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete reservation", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_current_for_slot(
        &self,
        slot_template_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar(CURRENT_COUNT_FOR_SLOT)
            .bind(slot_template_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
            })
    }

    async fn count_current_for_slots(
        &self,
        slot_template_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<(Uuid, i64)>> {
        sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT r.slot_template_id, COUNT(*) FROM reservations r \
             JOIN subscriptions s ON s.id = r.subscription_id \
             WHERE r.slot_template_id = ANY($1) AND s.active \
               AND s.starts_at <= $2 AND s.ends_at >= $2 \
             GROUP BY r.slot_template_id",
        )
        .bind(slot_template_ids)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
        })
    }

    async fn count_for_subscription(&self, subscription_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE subscription_id = $1")
            .bind(subscription_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
            })
    }

    async fn exists_for_member_slot(
        &self,
        member_id: Uuid,
        slot_template_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reservations r \
             JOIN subscriptions s ON s.id = r.subscription_id \
             WHERE s.member_id = $1 AND r.slot_template_id = $2 AND s.active \
               AND s.starts_at <= $3 AND s.ends_at >= $3)",
        )
        .bind(member_id)
        .bind(slot_template_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check for reservation", e)
        })
    }

    async fn list_for_subscription(&self, subscription_id: Uuid) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE subscription_id = $1 ORDER BY created_at ASC",
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list reservations", e)
        })
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations r \
             JOIN subscriptions s ON s.id = r.subscription_id \
             WHERE s.member_id = $1",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count reservations", e)
        })?;

        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT r.* FROM reservations r \
             JOIN subscriptions s ON s.id = r.subscription_id \
             WHERE s.member_id = $1 \
             ORDER BY r.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(member_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list reservations", e)
        })?;

        Ok(PageResponse::new(
            reservations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
