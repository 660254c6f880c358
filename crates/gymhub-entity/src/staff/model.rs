//! Staff entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A staff member; slot templates reference staff as instructors.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Whether the staff record is active.
    pub active: bool,
    /// When the staff member was registered.
    pub created_at: DateTime<Utc>,
}
