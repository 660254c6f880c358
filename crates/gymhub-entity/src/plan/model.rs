//! Plan entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::quota::WeeklyQuota;

/// A membership plan sold by the gym.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    /// Unique plan identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Weekly class quota (closed enumeration: 2, 3, or 5).
    pub weekly_quota: WeeklyQuota,
    /// Price in integer cents.
    pub price_cents: i64,
    /// Whether the plan is currently sold.
    pub active: bool,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlan {
    /// Display name.
    pub name: String,
    /// Weekly class quota.
    pub weekly_quota: WeeklyQuota,
    /// Price in integer cents.
    pub price_cents: i64,
}
