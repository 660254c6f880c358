//! Slot template entity model and the interval-overlap rule.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::weekday::Weekday;

/// A recurring weekly class definition: room, instructor, weekday, start
/// time, duration, and capacity.
///
/// Templates are soft-disabled (`active = false`) rather than deleted once
/// referenced by reservations or check-ins; the history stays as audit
/// trail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SlotTemplate {
    /// Unique template identifier.
    pub id: Uuid,
    /// Room the class runs in.
    pub room_id: Uuid,
    /// Instructor (staff) teaching the class.
    pub instructor_id: Uuid,
    /// Day of the week.
    pub weekday: Weekday,
    /// Start time of day (second precision).
    pub start_time: NaiveTime,
    /// Duration in minutes.
    pub duration_minutes: i32,
    /// Member capacity (defaults to the room's capacity when created).
    pub capacity: i32,
    /// Whether the template is in the active catalog.
    pub active: bool,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
    /// When the template was last updated.
    pub updated_at: DateTime<Utc>,
}

impl SlotTemplate {
    /// Start of the interval in seconds from midnight.
    fn start_seconds(&self) -> i64 {
        i64::from(self.start_time.num_seconds_from_midnight())
    }

    /// Exclusive end of the interval in seconds from midnight.
    fn end_seconds(&self) -> i64 {
        self.start_seconds() + i64::from(self.duration_minutes) * 60
    }

    /// Whether this template's half-open interval `[start, start+duration)`
    /// overlaps another's. Two intervals overlap iff
    /// `a < b + d2 && b < a + d`; touching boundaries do not overlap.
    ///
    /// Only meaningful within the same room and weekday; callers filter on
    /// those first. [`SlotTemplate::conflicts_with`] does both checks.
    pub fn interval_overlaps(&self, other: &SlotTemplate) -> bool {
        self.start_seconds() < other.end_seconds() && other.start_seconds() < self.end_seconds()
    }

    /// Whether this template conflicts with another: same room, same
    /// weekday, overlapping time intervals.
    pub fn conflicts_with(&self, other: &SlotTemplate) -> bool {
        self.room_id == other.room_id
            && self.weekday == other.weekday
            && self.interval_overlaps(other)
    }
}

/// Data required to create a new slot template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotTemplate {
    /// Room the class runs in.
    pub room_id: Uuid,
    /// Instructor teaching the class.
    pub instructor_id: Uuid,
    /// Day of the week.
    pub weekday: Weekday,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// Duration in minutes.
    pub duration_minutes: i32,
    /// Capacity override; falls back to the room's capacity when `None`.
    pub capacity: Option<i32>,
}

/// Fields that can change on an existing slot template. The room is fixed
/// for the life of the template; move a class by deactivating the old
/// template and creating a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSlotTemplate {
    /// The template to update.
    pub id: Uuid,
    /// New instructor.
    pub instructor_id: Option<Uuid>,
    /// New weekday.
    pub weekday: Option<Weekday>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New duration in minutes.
    pub duration_minutes: Option<i32>,
    /// New capacity.
    pub capacity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(room: Uuid, weekday: Weekday, start: (u32, u32), duration: i32) -> SlotTemplate {
        SlotTemplate {
            id: Uuid::new_v4(),
            room_id: room,
            instructor_id: Uuid::new_v4(),
            weekday,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            duration_minutes: duration,
            capacity: 10,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlapping_intervals_conflict() {
        let room = Uuid::new_v4();
        // 09:00-10:00 vs 09:30-10:15, same room and day
        let a = slot(room, Weekday::Monday, (9, 0), 60);
        let b = slot(room, Weekday::Monday, (9, 30), 45);
        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
    }

    #[test]
    fn test_touching_boundaries_do_not_conflict() {
        let room = Uuid::new_v4();
        // 09:00-10:00 then 10:00-10:30: 10:00 is the exclusive boundary
        let a = slot(room, Weekday::Monday, (9, 0), 60);
        let c = slot(room, Weekday::Monday, (10, 0), 30);
        assert!(!a.conflicts_with(&c));
        assert!(!c.conflicts_with(&a));
    }

    #[test]
    fn test_contained_interval_conflicts() {
        let room = Uuid::new_v4();
        let outer = slot(room, Weekday::Friday, (18, 0), 120);
        let inner = slot(room, Weekday::Friday, (18, 30), 30);
        assert!(outer.conflicts_with(&inner));
    }

    #[test]
    fn test_different_room_or_day_never_conflicts() {
        let a = slot(Uuid::new_v4(), Weekday::Monday, (9, 0), 60);
        let mut b = slot(Uuid::new_v4(), Weekday::Monday, (9, 0), 60);
        assert!(!a.conflicts_with(&b));

        b.room_id = a.room_id;
        b.weekday = Weekday::Tuesday;
        assert!(!a.conflicts_with(&b));
    }
}
