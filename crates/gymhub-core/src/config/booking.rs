//! Scheduling and booking policy configuration.

use serde::{Deserialize, Serialize};

/// Policy knobs for the scheduling and reservation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Whether a member must hold a reservation for a slot before checking
    /// in at it. The historical behavior is `false` (drop-ins allowed);
    /// reservation and check-in remain decoupled facts either way.
    #[serde(default)]
    pub require_reservation_for_checkin: bool,
    /// Days of subscription granted by an approved payment order when the
    /// approval does not request an explicit duration.
    #[serde(default = "default_subscription_days")]
    pub default_subscription_days: i64,
    /// Days a payment order may sit unresolved before the expiry sweep
    /// marks it `expirado`.
    #[serde(default = "default_order_expiry_days")]
    pub order_expiry_days: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            require_reservation_for_checkin: false,
            default_subscription_days: default_subscription_days(),
            order_expiry_days: default_order_expiry_days(),
        }
    }
}

fn default_subscription_days() -> i64 {
    30
}

fn default_order_expiry_days() -> i64 {
    7
}
