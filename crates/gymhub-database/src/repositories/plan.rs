//! Plan catalog repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::plan::Plan;

use crate::stores::PlanStore;

/// Repository for the membership plan catalog.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    /// Create a new plan repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PlanRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Plan>> {
        sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find plan by id", e)
            })
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Plan>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plans WHERE active")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count plans", e))?;

        let plans = sqlx::query_as::<_, Plan>(
            "SELECT * FROM plans WHERE active ORDER BY price_cents ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list plans", e))?;

        Ok(PageResponse::new(
            plans,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
