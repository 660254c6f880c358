//! Staff directory repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gymhub_core::error::{AppError, ErrorKind};
use gymhub_core::result::AppResult;

use crate::stores::StaffStore;

/// Repository for staff directory reads.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    /// Create a new staff repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffStore for StaffRepository {
    async fn exists_active(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM staff WHERE id = $1 AND active)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check staff existence", e)
        })
    }
}
