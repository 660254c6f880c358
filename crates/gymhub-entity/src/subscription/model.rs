//! Subscription entity model and the monotonic-extension rule.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A member's paid-for entitlement to a plan for a bounded date range.
///
/// Created or extended when a payment order is approved; cancelled
/// (`active = false`, never deleted) when the originating order is later
/// rejected. Date expiry is not swept automatically; callers interpret
/// `ends_at < now`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: Uuid,
    /// Owning member.
    pub member_id: Uuid,
    /// Plan the subscription grants.
    pub plan_id: Uuid,
    /// The payment order that created the subscription, if any.
    pub payment_order_id: Option<Uuid>,
    /// Start of the paid period.
    pub starts_at: DateTime<Utc>,
    /// End of the paid period.
    pub ends_at: DateTime<Utc>,
    /// Whether the subscription is active (false = cancelled).
    pub active: bool,
    /// When the subscription record was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscription {
    /// Owning member.
    pub member_id: Uuid,
    /// Plan the subscription grants.
    pub plan_id: Uuid,
    /// Originating payment order, if any.
    pub payment_order_id: Option<Uuid>,
    /// Start of the paid period.
    pub starts_at: DateTime<Utc>,
    /// End of the paid period.
    pub ends_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether the subscription is in force at the given instant: the
    /// active flag is set and `starts_at <= now <= ends_at`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.active && self.starts_at <= now && now <= self.ends_at
    }

    /// The end date after granting `days` more days at `now`, per the
    /// monotonic-extension rule: `max(ends_at, now + days)`. Approving an
    /// order never shortens a member's paid-through date.
    pub fn extended_end(&self, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
        self.ends_at.max(now + Duration::days(days))
    }
}
