//! Live capacity calculation.
//!
//! Remaining capacity is always derived from the reservation ledger at call
//! time; nothing here caches or stores a counter.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use gymhub_core::clock::Clock;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_database::stores::{ReservationStore, SlotTemplateStore};
use gymhub_entity::slot::{SlotTemplate, Weekday};

/// A slot template together with its live occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    /// The slot template.
    pub slot: SlotTemplate,
    /// Reservations held by currently-active subscriptions.
    pub reserved: i64,
    /// Seats left: `capacity - reserved`, floored at zero (capacity may be
    /// lowered below the held count by an admin).
    pub remaining: i64,
}

impl SlotAvailability {
    fn derive(slot: SlotTemplate, reserved: i64) -> Self {
        let remaining = (i64::from(slot.capacity) - reserved).max(0);
        Self {
            slot,
            reserved,
            remaining,
        }
    }
}

/// Computes remaining capacity per slot from the reservation ledger.
#[derive(Debug, Clone)]
pub struct CapacityService {
    slots: Arc<dyn SlotTemplateStore>,
    reservations: Arc<dyn ReservationStore>,
    clock: Arc<dyn Clock>,
}

impl CapacityService {
    /// Creates a new capacity service.
    pub fn new(
        slots: Arc<dyn SlotTemplateStore>,
        reservations: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slots,
            reservations,
            clock,
        }
    }

    /// Live occupancy for one slot.
    pub async fn availability(&self, slot_id: Uuid) -> AppResult<SlotAvailability> {
        let slot = self
            .slots
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Slot template {slot_id} not found")))?;

        let reserved = self
            .reservations
            .count_current_for_slot(slot.id, self.clock.now())
            .await?;
        Ok(SlotAvailability::derive(slot, reserved))
    }

    /// Live occupancy for every active slot on a weekday, ordered by start
    /// time, for calendar rendering.
    pub async fn availability_for_weekday(
        &self,
        weekday: Weekday,
    ) -> AppResult<Vec<SlotAvailability>> {
        let slots = self.slots.list_by_weekday(weekday).await?;
        let ids: Vec<Uuid> = slots.iter().map(|s| s.id).collect();
        let counts: HashMap<Uuid, i64> = self
            .reservations
            .count_current_for_slots(&ids, self.clock.now())
            .await?
            .into_iter()
            .collect();

        Ok(slots
            .into_iter()
            .map(|slot| {
                let reserved = counts.get(&slot.id).copied().unwrap_or(0);
                SlotAvailability::derive(slot, reserved)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use gymhub_core::clock::FixedClock;

    use crate::testing::{self, InMemoryReservations, InMemorySlots};

    #[tokio::test]
    async fn test_remaining_counts_only_current_subscriptions() {
        let now = testing::anchor();
        let room = testing::room(10);
        let instructor = testing::staff();
        let mut slot = testing::slot(room.id, instructor.id, Weekday::Monday, (9, 0));
        slot.capacity = 2;

        let member = testing::member(true);
        let plan = testing::plan(gymhub_entity::plan::WeeklyQuota::Five);
        let live = testing::subscription(member.id, plan.id, now);
        let mut lapsed = testing::subscription(member.id, plan.id, now);
        lapsed.ends_at = now - Duration::days(1);

        let reservations = Arc::new(InMemoryReservations::with_subscriptions(vec![
            live.clone(),
            lapsed.clone(),
        ]));
        reservations
            .insert_if_capacity(live.id, slot.id, slot.capacity, now)
            .await
            .unwrap()
            .unwrap();
        // A lapsed subscription's reservation does not occupy a seat.
        reservations.rows.lock().unwrap().push(gymhub_entity::reservation::Reservation {
            id: Uuid::new_v4(),
            subscription_id: lapsed.id,
            slot_template_id: slot.id,
            created_at: now,
        });

        let service = CapacityService::new(
            Arc::new(InMemorySlots::with(vec![slot.clone()])),
            reservations,
            Arc::new(FixedClock::new(now)),
        );

        let availability = service.availability(slot.id).await.unwrap();
        assert_eq!(availability.reserved, 1);
        assert_eq!(availability.remaining, 1);
    }

    #[tokio::test]
    async fn test_weekday_view_lists_every_active_slot() {
        let now = testing::anchor();
        let room = testing::room(10);
        let instructor = testing::staff();
        let nine = testing::slot(room.id, instructor.id, Weekday::Monday, (9, 0));
        let ten = testing::slot(room.id, instructor.id, Weekday::Monday, (10, 0));
        let other_day = testing::slot(room.id, instructor.id, Weekday::Friday, (9, 0));

        let service = CapacityService::new(
            Arc::new(InMemorySlots::with(vec![
                ten.clone(),
                nine.clone(),
                other_day,
            ])),
            Arc::new(InMemoryReservations::default()),
            Arc::new(FixedClock::new(now)),
        );

        let view = service
            .availability_for_weekday(Weekday::Monday)
            .await
            .unwrap();
        assert_eq!(view.len(), 2);
        // Ordered by start time, no reservations yet.
        assert_eq!(view[0].slot.id, nine.id);
        assert_eq!(view[0].remaining, i64::from(nine.capacity));
        assert_eq!(view[1].slot.id, ten.id);
    }
}
