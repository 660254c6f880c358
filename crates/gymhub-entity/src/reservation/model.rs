//! Reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A binding of an active subscription to a slot template, consuming one
/// unit of that slot's capacity.
///
/// A reservation has no lifecycle of its own: it is removed when the member
/// cancels or reschedules, or destroyed with its parent subscription.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier.
    pub id: Uuid,
    /// Owning subscription.
    pub subscription_id: Uuid,
    /// Reserved slot template.
    pub slot_template_id: Uuid,
    /// When the reservation was made.
    pub created_at: DateTime<Utc>,
}
