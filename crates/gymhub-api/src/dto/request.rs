//! Request DTOs.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_entity::checkin::CheckInOrigin;
use gymhub_entity::slot::Weekday;

/// Run validator checks and fold failures into a Validation error.
pub fn validated<T: Validate>(dto: T) -> AppResult<T> {
    dto.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(dto)
}

/// Create a recurring slot template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSlotRequest {
    /// Room the class runs in.
    pub room_id: Uuid,
    /// Instructor teaching the class.
    pub instructor_id: Uuid,
    /// Day of the week (0 = Sunday .. 6 = Saturday).
    pub weekday: Weekday,
    /// Start time of day, e.g. `"09:00:00"`.
    pub start_time: NaiveTime,
    /// Duration in minutes.
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: i32,
    /// Capacity override; defaults to the room's capacity.
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// Update an existing slot template. Absent fields are left unchanged; the
/// room is fixed for the life of the template.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSlotRequest {
    /// New instructor.
    pub instructor_id: Option<Uuid>,
    /// New weekday.
    pub weekday: Option<Weekday>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New duration in minutes.
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<i32>,
    /// New capacity.
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// Reserve a seat in a slot for a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    /// The reserving subscription.
    pub subscription_id: Uuid,
    /// The slot to reserve.
    pub slot_template_id: Uuid,
}

/// Move a subscription's reservation to another slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    /// The moving subscription.
    pub subscription_id: Uuid,
    /// The slot currently held.
    pub old_slot_template_id: Uuid,
    /// The slot to move to.
    pub new_slot_template_id: Uuid,
}

/// Record a check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckInRequest {
    /// The member checking in.
    pub member_id: Uuid,
    /// The slot attended, if any.
    pub slot_template_id: Option<Uuid>,
    /// Where the check-in was recorded from; defaults to `reception`.
    pub origin: Option<CheckInOrigin>,
}

/// Open a payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentOrderRequest {
    /// The paying member.
    pub member_id: Uuid,
    /// The plan being bought.
    pub plan_id: Uuid,
}

/// Approve a payment order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApproveOrderRequest {
    /// Subscription days granted; defaults to `booking.default_subscription_days`.
    #[validate(range(min = 1))]
    pub days: Option<i64>,
}

/// Reject a payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectOrderRequest {
    /// Why the proof of payment was rejected.
    pub notes: Option<String>,
}
