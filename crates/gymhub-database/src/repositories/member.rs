//! Member directory repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::member::Member;

use crate::stores::MemberStore;

/// Repository for member directory reads.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Create a new member repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find member by id", e)
            })
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check member existence", e)
            })
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Member>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE active")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count members", e))?;

        let members = sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE active ORDER BY full_name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))?;

        Ok(PageResponse::new(
            members,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
