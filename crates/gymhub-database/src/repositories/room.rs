//! Room directory repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::room::Room;

use crate::stores::RoomStore;

/// Repository for room directory reads.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Create a new room repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomStore for RoomRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find room by id", e)
            })
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Room>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE active")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count rooms", e))?;

        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE active ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list rooms", e))?;

        Ok(PageResponse::new(
            rooms,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
