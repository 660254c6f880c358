//! Payment order entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::PaymentOrderStatus;

/// A request/approval workflow record that, once verified, creates or
/// extends the member's subscription.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentOrder {
    /// Unique order identifier.
    pub id: Uuid,
    /// Paying member.
    pub member_id: Uuid,
    /// Plan being bought.
    pub plan_id: Uuid,
    /// Amount due, in integer cents (the plan price at creation time).
    pub amount_cents: i64,
    /// Current lifecycle state.
    pub status: PaymentOrderStatus,
    /// Stored path of the proof-of-payment attachment, if uploaded.
    pub receipt_path: Option<String>,
    /// Free-text notes recorded at approval/rejection.
    pub resolution_notes: Option<String>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order times out if unresolved.
    pub expires_at: DateTime<Utc>,
    /// When the order was approved or rejected.
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Data required to create a new payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentOrder {
    /// Paying member.
    pub member_id: Uuid,
    /// Plan being bought.
    pub plan_id: Uuid,
    /// Amount due, in integer cents.
    pub amount_cents: i64,
    /// Expiry deadline.
    pub expires_at: DateTime<Utc>,
}
