//! Check-in log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::checkin::model::CreateCheckIn;
use gymhub_entity::checkin::CheckIn;

use crate::stores::CheckInStore;

/// Repository for the append-only check-in log.
#[derive(Debug, Clone)]
pub struct CheckInRepository {
    pool: PgPool,
}

impl CheckInRepository {
    /// Create a new check-in repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckInStore for CheckInRepository {
    async fn insert(&self, data: &CreateCheckIn) -> AppResult<CheckIn> {
        sqlx::query_as::<_, CheckIn>(
            "INSERT INTO check_ins (member_id, slot_template_id, checked_in_at, origin) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.member_id)
        .bind(data.slot_template_id)
        .bind(data.checked_in_at)
        .bind(data.origin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record check-in", e))
    }

    async fn exists_on_day(
        &self,
        member_id: Uuid,
        slot_template_id: Option<Uuid>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM check_ins \
             WHERE member_id = $1 \
               AND slot_template_id IS NOT DISTINCT FROM $2 \
               AND checked_in_at >= $3 AND checked_in_at < $4)",
        )
        .bind(member_id)
        .bind(slot_template_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check for prior check-in", e)
        })
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM check_ins WHERE member_id = $1")
                .bind(member_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count check-ins", e)
                })?;

        let checkins = sqlx::query_as::<_, CheckIn>(
            "SELECT * FROM check_ins WHERE member_id = $1 \
             ORDER BY checked_in_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(member_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list check-ins", e))?;

        Ok(PageResponse::new(
            checkins,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn list_for_slot(
        &self,
        slot_template_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM check_ins WHERE slot_template_id = $1")
                .bind(slot_template_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count check-ins", e)
                })?;

        let checkins = sqlx::query_as::<_, CheckIn>(
            "SELECT * FROM check_ins WHERE slot_template_id = $1 \
             ORDER BY checked_in_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(slot_template_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list check-ins", e))?;

        Ok(PageResponse::new(
            checkins,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
