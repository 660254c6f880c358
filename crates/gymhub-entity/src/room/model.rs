//! Room entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A physical room. Slot capacity defaults to the room's capacity unless
/// the template overrides it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    /// Unique room identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Maximum headcount the room supports.
    pub capacity: i32,
    /// Whether the room is in service.
    pub active: bool,
    /// When the room was registered.
    pub created_at: DateTime<Utc>,
}
