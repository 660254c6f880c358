//! Check-in recording.
//!
//! A check-in is an attendance fact, deliberately decoupled from the
//! reservation ledger: walking in without a reservation is allowed unless
//! the `booking.require_reservation_for_checkin` policy says otherwise.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use gymhub_core::clock::Clock;
use gymhub_core::config::booking::BookingConfig;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_database::stores::{CheckInStore, MemberStore, ReservationStore, SlotTemplateStore};
use gymhub_entity::checkin::model::CreateCheckIn;
use gymhub_entity::checkin::{CheckIn, CheckInOrigin};

/// Records member attendance, at most once per (member, slot, UTC day).
#[derive(Debug, Clone)]
pub struct CheckInService {
    checkins: Arc<dyn CheckInStore>,
    members: Arc<dyn MemberStore>,
    slots: Arc<dyn SlotTemplateStore>,
    reservations: Arc<dyn ReservationStore>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl CheckInService {
    /// Creates a new check-in service.
    pub fn new(
        checkins: Arc<dyn CheckInStore>,
        members: Arc<dyn MemberStore>,
        slots: Arc<dyn SlotTemplateStore>,
        reservations: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self {
            checkins,
            members,
            slots,
            reservations,
            clock,
            config,
        }
    }

    /// Records a check-in for a member, optionally against a slot.
    ///
    /// The duplicate rule is at most one check-in per (member, slot,
    /// UTC calendar day); a slot-less check-in is its own bucket. The
    /// check is read-then-insert by design: the log carries no unique
    /// constraint, this recorder is the sole writer.
    pub async fn record(
        &self,
        member_id: Uuid,
        slot_template_id: Option<Uuid>,
        origin: Option<CheckInOrigin>,
    ) -> AppResult<CheckIn> {
        if !self.members.exists(member_id).await? {
            return Err(AppError::not_found(format!("Member {member_id} not found")));
        }

        let now = self.clock.now();
        if let Some(slot_id) = slot_template_id {
            if self.slots.find_by_id(slot_id).await?.is_none() {
                return Err(AppError::not_found(format!(
                    "Slot template {slot_id} not found"
                )));
            }
            if self.config.require_reservation_for_checkin
                && !self
                    .reservations
                    .exists_for_member_slot(member_id, slot_id, now)
                    .await?
            {
                return Err(AppError::conflict(
                    "Member holds no reservation for this slot",
                ));
            }
        }

        let (day_start, day_end) = utc_day_bounds(now);
        if self
            .checkins
            .exists_on_day(member_id, slot_template_id, day_start, day_end)
            .await?
        {
            return Err(AppError::conflict(
                "Member already checked in for this slot today",
            ));
        }

        let checkin = self
            .checkins
            .insert(&CreateCheckIn {
                member_id,
                slot_template_id,
                checked_in_at: now,
                origin: origin.unwrap_or_default(),
            })
            .await?;

        info!(
            checkin_id = %checkin.id,
            member_id = %member_id,
            origin = %checkin.origin,
            "Recorded check-in"
        );
        Ok(checkin)
    }

    /// Lists a member's check-ins, most recent first.
    pub async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>> {
        self.checkins.list_for_member(member_id, page).await
    }

    /// Lists a slot's check-ins, most recent first.
    pub async fn list_for_slot(
        &self,
        slot_template_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>> {
        self.checkins.list_for_slot(slot_template_id, page).await
    }
}

/// The half-open UTC calendar day `[00:00, +1d)` containing an instant.
fn utc_day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (day_start, day_start + Duration::days(1))
}
