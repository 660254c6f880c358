//! Member entity model.
//!
//! Member CRUD is owned by the surrounding back office; the engine only
//! reads members through the directory interface, so the model carries the
//! fields the engine needs and nothing more.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A gym member (socio).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Unique member identifier.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Email address (optional).
    pub email: Option<String>,
    /// Whether the member record is active.
    pub active: bool,
    /// When the member was registered.
    pub created_at: DateTime<Utc>,
}
