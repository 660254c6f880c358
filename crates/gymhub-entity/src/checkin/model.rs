//! Check-in entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::origin::CheckInOrigin;

/// A timestamped attendance fact for a member, optionally tied to a slot.
///
/// Append-only: at most one check-in per (member, slot, UTC calendar day),
/// enforced by the recorder's pre-insert existence check rather than a
/// database constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckIn {
    /// Unique check-in identifier.
    pub id: Uuid,
    /// Member who attended.
    pub member_id: Uuid,
    /// Slot attended, if the visit was for a class.
    pub slot_template_id: Option<Uuid>,
    /// When the member checked in (UTC).
    pub checked_in_at: DateTime<Utc>,
    /// Where the check-in was recorded from.
    pub origin: CheckInOrigin,
}

/// Data required to record a new check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckIn {
    /// Member who is checking in.
    pub member_id: Uuid,
    /// Slot being attended, if any.
    pub slot_template_id: Option<Uuid>,
    /// Check-in instant (from the injected clock).
    pub checked_in_at: DateTime<Utc>,
    /// Recording origin.
    pub origin: CheckInOrigin,
}
