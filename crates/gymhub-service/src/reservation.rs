//! Reservation ledger service.
//!
//! A reservation is a standing claim on one weekly slot by one subscription.
//! Every precondition failure maps to its own distinguishable Conflict so
//! the front desk can tell a full class from an exhausted quota.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use gymhub_core::clock::Clock;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_database::stores::{PlanStore, ReservationStore, SlotTemplateStore, SubscriptionStore};
use gymhub_entity::reservation::Reservation;
use gymhub_entity::slot::SlotTemplate;
use gymhub_entity::subscription::Subscription;

/// Manages standing reservations against the weekly schedule.
#[derive(Debug, Clone)]
pub struct ReservationService {
    reservations: Arc<dyn ReservationStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    slots: Arc<dyn SlotTemplateStore>,
    plans: Arc<dyn PlanStore>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    /// Creates a new reservation service.
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        slots: Arc<dyn SlotTemplateStore>,
        plans: Arc<dyn PlanStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservations,
            subscriptions,
            slots,
            plans,
            clock,
        }
    }

    /// Reserves a seat in a slot for a subscription.
    ///
    /// Preconditions, in order: the subscription is in force, the slot is
    /// active, the subscription does not already hold this slot, the plan's
    /// weekly quota is not exhausted, and the slot has a seat left. The
    /// capacity check and the insert are one atomic store operation.
    pub async fn reserve(&self, subscription_id: Uuid, slot_id: Uuid) -> AppResult<Reservation> {
        let now = self.clock.now();
        let subscription = self.require_current_subscription(subscription_id, now).await?;
        let slot = self.require_active_slot(slot_id).await?;

        if self
            .reservations
            .find_for_subscription_slot(subscription.id, slot.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Subscription already holds a reservation for this slot",
            ));
        }

        let plan = self
            .plans
            .find_by_id(subscription.plan_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Subscription {} references missing plan {}",
                    subscription.id, subscription.plan_id
                ))
            })?;

        let held = self
            .reservations
            .count_for_subscription(subscription.id)
            .await?;
        let quota = plan.weekly_quota.classes_per_week();
        if held >= quota {
            return Err(AppError::conflict(format!(
                "Weekly quota exhausted: {held} of {quota} classes reserved"
            )));
        }

        let reservation = self
            .reservations
            .insert_if_capacity(subscription.id, slot.id, slot.capacity, now)
            .await?
            .ok_or_else(|| AppError::conflict("Slot capacity exhausted"))?;

        info!(
            reservation_id = %reservation.id,
            subscription_id = %subscription.id,
            slot_id = %slot.id,
            "Created reservation"
        );
        Ok(reservation)
    }

    /// Releases a reservation unconditionally.
    pub async fn release(&self, reservation_id: Uuid) -> AppResult<()> {
        if !self.reservations.delete(reservation_id).await? {
            return Err(AppError::not_found(format!(
                "Reservation {reservation_id} not found"
            )));
        }
        info!(reservation_id = %reservation_id, "Released reservation");
        Ok(())
    }

    /// Moves a subscription's reservation from one slot to another:
    /// insert-new-then-release-old. When the new slot is full the old
    /// reservation is left untouched.
    ///
    /// The quota check is skipped: the net held count does not change.
    pub async fn reschedule(
        &self,
        subscription_id: Uuid,
        old_slot_id: Uuid,
        new_slot_id: Uuid,
    ) -> AppResult<Reservation> {
        let now = self.clock.now();
        let subscription = self.require_current_subscription(subscription_id, now).await?;

        let old = self
            .reservations
            .find_for_subscription_slot(subscription.id, old_slot_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Subscription {subscription_id} holds no reservation for slot {old_slot_id}"
                ))
            })?;

        let new_slot = self.require_active_slot(new_slot_id).await?;
        if self
            .reservations
            .find_for_subscription_slot(subscription.id, new_slot.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Subscription already holds a reservation for this slot",
            ));
        }

        let reservation = self
            .reservations
            .insert_if_capacity(subscription.id, new_slot.id, new_slot.capacity, now)
            .await?
            .ok_or_else(|| AppError::conflict("Slot capacity exhausted"))?;

        self.reservations.delete(old.id).await?;

        info!(
            subscription_id = %subscription.id,
            from = %old_slot_id,
            to = %new_slot_id,
            "Rescheduled reservation"
        );
        Ok(reservation)
    }

    /// Lists the reservations held by a subscription.
    pub async fn list_for_subscription(
        &self,
        subscription_id: Uuid,
    ) -> AppResult<Vec<Reservation>> {
        self.reservations.list_for_subscription(subscription_id).await
    }

    /// Lists a member's reservations across all their subscriptions.
    pub async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        self.reservations.list_for_member(member_id, page).await
    }

    async fn require_current_subscription(
        &self,
        subscription_id: Uuid,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<Subscription> {
        let subscription = self
            .subscriptions
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Subscription {subscription_id} not found"))
            })?;

        if !subscription.is_current(now) {
            return Err(AppError::conflict(format!(
                "Subscription {subscription_id} is not in force"
            )));
        }
        Ok(subscription)
    }

    async fn require_active_slot(&self, slot_id: Uuid) -> AppResult<SlotTemplate> {
        let slot = self
            .slots
            .find_by_id(slot_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Slot template {slot_id} not found")))?;

        if !slot.active {
            return Err(AppError::conflict(format!(
                "Slot template {slot_id} is no longer active"
            )));
        }
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use gymhub_core::clock::FixedClock;
    use gymhub_core::error::ErrorKind;
    use gymhub_entity::plan::WeeklyQuota;
    use gymhub_entity::slot::Weekday;

    use crate::testing::{
        self, InMemoryPlans, InMemoryReservations, InMemorySlots, InMemorySubscriptions,
    };

    struct Fixture {
        service: ReservationService,
        reservations: Arc<InMemoryReservations>,
        clock: Arc<FixedClock>,
    }

    fn fixture(
        quota: WeeklyQuota,
        slots: Vec<gymhub_entity::slot::SlotTemplate>,
        subscriptions: Vec<Subscription>,
    ) -> (Fixture, gymhub_entity::plan::Plan) {
        let now = testing::anchor();
        let plan = {
            let mut p = testing::plan(quota);
            // Reuse the plan id the subscriptions were built against.
            if let Some(sub) = subscriptions.first() {
                p.id = sub.plan_id;
            }
            p
        };
        let reservations = Arc::new(InMemoryReservations::with_subscriptions(
            subscriptions.clone(),
        ));
        let clock = Arc::new(FixedClock::new(now));
        let service = ReservationService::new(
            reservations.clone(),
            Arc::new(InMemorySubscriptions::with(subscriptions)),
            Arc::new(InMemorySlots::with(slots)),
            Arc::new(InMemoryPlans::with(vec![plan.clone()])),
            clock.clone(),
        );
        (
            Fixture {
                service,
                reservations,
                clock,
            },
            plan,
        )
    }

    fn capacity_two_slot() -> gymhub_entity::slot::SlotTemplate {
        let room = testing::room(2);
        let mut slot = testing::slot(room.id, testing::staff().id, Weekday::Monday, (9, 0));
        slot.capacity = 2;
        slot
    }

    #[tokio::test]
    async fn test_capacity_ceiling_third_reservation_rejected() {
        // Capacity-2 slot: S1 and S2 reserve, S3 is turned away.
        let now = testing::anchor();
        let plan_id = Uuid::new_v4();
        let subs: Vec<Subscription> = (0..3)
            .map(|_| testing::subscription(Uuid::new_v4(), plan_id, now))
            .collect();
        let slot = capacity_two_slot();
        let (fx, _) = fixture(WeeklyQuota::Five, vec![slot.clone()], subs.clone());

        fx.service.reserve(subs[0].id, slot.id).await.unwrap();
        fx.service.reserve(subs[1].id, slot.id).await.unwrap();

        let err = fx.service.reserve(subs[2].id, slot.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("capacity"));

        // A release frees the seat for S3.
        let held = fx
            .reservations
            .find_for_subscription_slot(subs[0].id, slot.id)
            .await
            .unwrap()
            .unwrap();
        fx.service.release(held.id).await.unwrap();
        fx.service.reserve(subs[2].id, slot.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_quota_ceiling() {
        let now = testing::anchor();
        let sub = testing::subscription(Uuid::new_v4(), Uuid::new_v4(), now);
        let room = testing::room(10);
        let slots: Vec<_> = (0..3)
            .map(|i| {
                testing::slot(
                    room.id,
                    testing::staff().id,
                    Weekday::Monday,
                    (9 + i as u32, 0),
                )
            })
            .collect();
        let (fx, _) = fixture(WeeklyQuota::Two, slots.clone(), vec![sub.clone()]);

        fx.service.reserve(sub.id, slots[0].id).await.unwrap();
        fx.service.reserve(sub.id, slots[1].id).await.unwrap();

        let err = fx.service.reserve(sub.id, slots[2].id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("quota"));
    }

    #[tokio::test]
    async fn test_duplicate_slot_reservation_rejected() {
        let now = testing::anchor();
        let sub = testing::subscription(Uuid::new_v4(), Uuid::new_v4(), now);
        let slot = capacity_two_slot();
        let (fx, _) = fixture(WeeklyQuota::Five, vec![slot.clone()], vec![sub.clone()]);

        fx.service.reserve(sub.id, slot.id).await.unwrap();
        let err = fx.service.reserve(sub.id, slot.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.contains("already holds"));
    }

    #[tokio::test]
    async fn test_lapsed_subscription_cannot_reserve() {
        let now = testing::anchor();
        let mut sub = testing::subscription(Uuid::new_v4(), Uuid::new_v4(), now);
        sub.ends_at = now - Duration::days(1);
        let slot = capacity_two_slot();
        let (fx, _) = fixture(WeeklyQuota::Five, vec![slot.clone()], vec![sub.clone()]);

        let err = fx.service.reserve(sub.id, slot.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_lapsed_reservations_free_seats_for_others() {
        // Seats held by lapsed subscriptions do not count against capacity.
        let now = testing::anchor();
        let plan_id = Uuid::new_v4();
        let mut lapsing = testing::subscription(Uuid::new_v4(), plan_id, now);
        lapsing.ends_at = now + Duration::days(1);
        let fresh = testing::subscription(Uuid::new_v4(), plan_id, now);
        let mut slot = capacity_two_slot();
        slot.capacity = 1;
        let (fx, _) = fixture(
            WeeklyQuota::Five,
            vec![slot.clone()],
            vec![lapsing.clone(), fresh.clone()],
        );

        fx.service.reserve(lapsing.id, slot.id).await.unwrap();
        let err = fx.service.reserve(fresh.id, slot.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Two days later the first subscription has lapsed; its standing
        // claim stops occupying the seat.
        fx.clock.advance(Duration::days(2));
        fx.service.reserve(fresh.id, slot.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_reschedule_keeps_old_reservation_when_target_full() {
        let now = testing::anchor();
        let plan_id = Uuid::new_v4();
        let mover = testing::subscription(Uuid::new_v4(), plan_id, now);
        let occupant = testing::subscription(Uuid::new_v4(), plan_id, now);
        let room = testing::room(10);
        let old_slot = testing::slot(room.id, testing::staff().id, Weekday::Monday, (9, 0));
        let mut full_slot = testing::slot(room.id, testing::staff().id, Weekday::Monday, (10, 0));
        full_slot.capacity = 1;
        let (fx, _) = fixture(
            WeeklyQuota::Five,
            vec![old_slot.clone(), full_slot.clone()],
            vec![mover.clone(), occupant.clone()],
        );

        fx.service.reserve(mover.id, old_slot.id).await.unwrap();
        fx.service.reserve(occupant.id, full_slot.id).await.unwrap();

        let err = fx
            .service
            .reschedule(mover.id, old_slot.id, full_slot.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // The old reservation survived the failed move.
        assert!(fx
            .reservations
            .find_for_subscription_slot(mover.id, old_slot.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_reschedule_works_at_quota() {
        let now = testing::anchor();
        let sub = testing::subscription(Uuid::new_v4(), Uuid::new_v4(), now);
        let room = testing::room(10);
        let old_slot = testing::slot(room.id, testing::staff().id, Weekday::Monday, (9, 0));
        let other = testing::slot(room.id, testing::staff().id, Weekday::Wednesday, (9, 0));
        let new_slot = testing::slot(room.id, testing::staff().id, Weekday::Tuesday, (9, 0));
        let (fx, _) = fixture(
            WeeklyQuota::Two,
            vec![old_slot.clone(), other.clone(), new_slot.clone()],
            vec![sub.clone()],
        );

        fx.service.reserve(sub.id, old_slot.id).await.unwrap();
        fx.service.reserve(sub.id, other.id).await.unwrap();

        // The quota of two is fully used; moving one of the two claims must
        // still go through since the net held count is unchanged.
        let moved = fx
            .service
            .reschedule(sub.id, old_slot.id, new_slot.id)
            .await
            .unwrap();
        assert_eq!(moved.slot_template_id, new_slot.id);
        assert!(fx
            .reservations
            .find_for_subscription_slot(sub.id, old_slot.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_inactive_slot_rejected() {
        let now = testing::anchor();
        let sub = testing::subscription(Uuid::new_v4(), Uuid::new_v4(), now);
        let mut slot = capacity_two_slot();
        slot.active = false;
        let (fx, _) = fixture(WeeklyQuota::Five, vec![slot.clone()], vec![sub.clone()]);

        let err = fx.service.reserve(sub.id, slot.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
