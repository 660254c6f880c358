//! Slot template repository.
//!
//! Template writes serialize per (room, weekday) with a transaction-scoped
//! advisory lock, so two concurrent creations can never both pass the
//! overlap check.

use async_trait::async_trait;
use chrono::{Duration, NaiveTime};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_entity::slot::model::{CreateSlotTemplate, UpdateSlotTemplate};
use gymhub_entity::slot::{SlotTemplate, Weekday};

use crate::stores::SlotTemplateStore;

/// Repository for the recurring slot template catalog.
#[derive(Debug, Clone)]
pub struct SlotTemplateRepository {
    pool: PgPool,
}

impl SlotTemplateRepository {
    /// Create a new slot template repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Take the per-(room, weekday) advisory lock for the current
    /// transaction.
    async fn lock_room_day(
        tx: &mut Transaction<'_, Postgres>,
        room_id: Uuid,
        weekday: Weekday,
    ) -> AppResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("slot:{room_id}:{}", weekday.index()))
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to take schedule lock", e)
            })?;
        Ok(())
    }

    /// Find an active template in the same room and weekday whose half-open
    /// interval overlaps `[start, start + duration)`, excluding `exclude`.
    async fn find_overlapping(
        tx: &mut Transaction<'_, Postgres>,
        room_id: Uuid,
        weekday: Weekday,
        start_time: NaiveTime,
        duration_minutes: i32,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<SlotTemplate>> {
        sqlx::query_as::<_, SlotTemplate>(
            "SELECT * FROM slot_templates \
             WHERE room_id = $1 AND weekday = $2 AND active \
               AND id IS DISTINCT FROM $5 \
               AND EXTRACT(EPOCH FROM start_time) < EXTRACT(EPOCH FROM $3::time) + $4 * 60 \
               AND EXTRACT(EPOCH FROM $3::time) < EXTRACT(EPOCH FROM start_time) + duration_minutes * 60 \
             ORDER BY start_time ASC LIMIT 1",
        )
        .bind(room_id)
        .bind(weekday)
        .bind(start_time)
        .bind(duration_minutes)
        .bind(exclude)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check for slot overlap", e)
        })
    }

    fn overlap_conflict(conflicting: &SlotTemplate) -> AppError {
        let end = conflicting.start_time
            + Duration::minutes(i64::from(conflicting.duration_minutes));
        AppError::conflict(format!(
            "Slot overlaps template {} ({} {}-{} in the same room)",
            conflicting.id, conflicting.weekday, conflicting.start_time, end
        ))
    }
}

#[async_trait]
impl SlotTemplateStore for SlotTemplateRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SlotTemplate>> {
        sqlx::query_as::<_, SlotTemplate>("SELECT * FROM slot_templates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find slot template", e)
            })
    }

    async fn list_active(&self) -> AppResult<Vec<SlotTemplate>> {
        sqlx::query_as::<_, SlotTemplate>(
            "SELECT * FROM slot_templates WHERE active ORDER BY weekday ASC, start_time ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list slot templates", e)
        })
    }

    async fn list_by_weekday(&self, weekday: Weekday) -> AppResult<Vec<SlotTemplate>> {
        sqlx::query_as::<_, SlotTemplate>(
            "SELECT * FROM slot_templates WHERE weekday = $1 AND active ORDER BY start_time ASC",
        )
        .bind(weekday)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list slot templates by weekday",
                e,
            )
        })
    }

    async fn create(&self, data: &CreateSlotTemplate, capacity: i32) -> AppResult<SlotTemplate> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        Self::lock_room_day(&mut tx, data.room_id, data.weekday).await?;

        if let Some(conflicting) = Self::find_overlapping(
            &mut tx,
            data.room_id,
            data.weekday,
            data.start_time,
            data.duration_minutes,
            None,
        )
        .await?
        {
            return Err(Self::overlap_conflict(&conflicting));
        }

        let slot = sqlx::query_as::<_, SlotTemplate>(
            "INSERT INTO slot_templates \
                 (room_id, instructor_id, weekday, start_time, duration_minutes, capacity) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.room_id)
        .bind(data.instructor_id)
        .bind(data.weekday)
        .bind(data.start_time)
        .bind(data.duration_minutes)
        .bind(capacity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create slot template", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit slot creation", e)
        })?;

        Ok(slot)
    }

    async fn update(&self, data: &UpdateSlotTemplate) -> AppResult<SlotTemplate> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let current = sqlx::query_as::<_, SlotTemplate>(
            "SELECT * FROM slot_templates WHERE id = $1 FOR UPDATE",
        )
        .bind(data.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load slot template", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Slot template {} not found", data.id)))?;

        let weekday = data.weekday.unwrap_or(current.weekday);
        let start_time = data.start_time.unwrap_or(current.start_time);
        let duration_minutes = data.duration_minutes.unwrap_or(current.duration_minutes);

        Self::lock_room_day(&mut tx, current.room_id, weekday).await?;

        if let Some(conflicting) = Self::find_overlapping(
            &mut tx,
            current.room_id,
            weekday,
            start_time,
            duration_minutes,
            Some(current.id),
        )
        .await?
        {
            return Err(Self::overlap_conflict(&conflicting));
        }

        let slot = sqlx::query_as::<_, SlotTemplate>(
            "UPDATE slot_templates \
             SET instructor_id = COALESCE($2, instructor_id), \
                 weekday = $3, start_time = $4, duration_minutes = $5, \
                 capacity = COALESCE($6, capacity), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(data.id)
        .bind(data.instructor_id)
        .bind(weekday)
        .bind(start_time)
        .bind(duration_minutes)
        .bind(data.capacity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update slot template", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit slot update", e)
        })?;

        Ok(slot)
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE slot_templates SET active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to deactivate slot template", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
