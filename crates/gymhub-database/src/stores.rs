//! Store traits the scheduling engine depends on.
//!
//! Services hold `Arc<dyn ...Store>` rather than concrete repositories so
//! the engine's invariants can be exercised against in-memory doubles in
//! tests. The Pg implementations live in [`crate::repositories`].
//!
//! The two write paths with a read-check-write race (template overlap and
//! reservation capacity) are exposed as single guarded operations so each
//! implementation can make them atomic — the Pg repositories take a
//! transaction-scoped advisory lock, an in-memory double a mutex.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_entity::checkin::model::CreateCheckIn;
use gymhub_entity::checkin::CheckIn;
use gymhub_entity::member::Member;
use gymhub_entity::payment::model::CreatePaymentOrder;
use gymhub_entity::payment::{PaymentOrder, PaymentOrderStatus};
use gymhub_entity::plan::Plan;
use gymhub_entity::reservation::Reservation;
use gymhub_entity::room::Room;
use gymhub_entity::slot::model::{CreateSlotTemplate, UpdateSlotTemplate};
use gymhub_entity::slot::{SlotTemplate, Weekday};
use gymhub_entity::subscription::model::CreateSubscription;
use gymhub_entity::subscription::Subscription;

/// Read-only member directory (member CRUD is owned by the back office).
#[async_trait]
pub trait MemberStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a member by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>>;

    /// Check whether a member exists.
    async fn exists(&self, id: Uuid) -> AppResult<bool>;

    /// List active members.
    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Member>>;
}

/// Read-only staff directory; slot templates reference staff as instructors.
#[async_trait]
pub trait StaffStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether an active staff member exists.
    async fn exists_active(&self, id: Uuid) -> AppResult<bool>;
}

/// Read-only room directory.
#[async_trait]
pub trait RoomStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a room by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// List rooms in service.
    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Room>>;
}

/// Membership plan catalog.
#[async_trait]
pub trait PlanStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a plan by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Plan>>;

    /// List plans currently sold.
    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Plan>>;
}

/// Catalog of recurring weekly slot templates.
#[async_trait]
pub trait SlotTemplateStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a template by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SlotTemplate>>;

    /// List all active templates, ordered by weekday then start time.
    async fn list_active(&self) -> AppResult<Vec<SlotTemplate>>;

    /// List active templates on a weekday, ordered by start time.
    async fn list_by_weekday(&self, weekday: Weekday) -> AppResult<Vec<SlotTemplate>>;

    /// Insert a new template unless it would overlap an active template in
    /// the same room and weekday. The overlap check and insert are one
    /// atomic operation; an overlap fails with a Conflict naming the
    /// conflicting template.
    async fn create(&self, data: &CreateSlotTemplate, capacity: i32) -> AppResult<SlotTemplate>;

    /// Apply changes to a template under the same overlap rule, excluding
    /// the template's own prior record from the check.
    async fn update(&self, data: &UpdateSlotTemplate) -> AppResult<SlotTemplate>;

    /// Soft-disable a template. Historical reservations and check-ins are
    /// kept. Returns `false` when the id is unknown.
    async fn deactivate(&self, id: Uuid) -> AppResult<bool>;
}

/// Reservation ledger backing store.
#[async_trait]
pub trait ReservationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a reservation iff the slot still has capacity left, counting
    /// reservations held by subscriptions current at `now`. Returns `None`
    /// when the slot is full. Count and insert are one atomic operation.
    async fn insert_if_capacity(
        &self,
        subscription_id: Uuid,
        slot_template_id: Uuid,
        capacity: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Reservation>>;

    /// Find a reservation by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>>;

    /// Find the reservation a subscription holds for a specific slot.
    async fn find_for_subscription_slot(
        &self,
        subscription_id: Uuid,
        slot_template_id: Uuid,
    ) -> AppResult<Option<Reservation>>;

    /// Remove a reservation. Returns `false` when the id is unknown.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Count reservations on a slot held by subscriptions current at `now`.
    async fn count_current_for_slot(
        &self,
        slot_template_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<i64>;

    /// Per-slot current reservation counts for a set of slots. Slots with
    /// no reservations are absent from the result.
    async fn count_current_for_slots(
        &self,
        slot_template_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<(Uuid, i64)>>;

    /// Count all reservations held by a subscription.
    async fn count_for_subscription(&self, subscription_id: Uuid) -> AppResult<i64>;

    /// Whether a member holds a reservation for a slot through a
    /// subscription current at `now`.
    async fn exists_for_member_slot(
        &self,
        member_id: Uuid,
        slot_template_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// List reservations held by a subscription.
    async fn list_for_subscription(&self, subscription_id: Uuid) -> AppResult<Vec<Reservation>>;

    /// List reservations held by a member, joining through subscriptions.
    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>>;
}

/// Append-only check-in log.
#[async_trait]
pub trait CheckInStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a check-in.
    async fn insert(&self, data: &CreateCheckIn) -> AppResult<CheckIn>;

    /// Whether a check-in already exists for (member, slot) with a
    /// timestamp in `[day_start, day_end)`. A `None` slot matches only
    /// slot-less check-ins.
    async fn exists_on_day(
        &self,
        member_id: Uuid,
        slot_template_id: Option<Uuid>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// List a member's check-ins, most recent first.
    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>>;

    /// List a slot's check-ins, most recent first.
    async fn list_for_slot(
        &self,
        slot_template_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>>;
}

/// Subscription backing store.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new subscription.
    async fn insert(&self, data: &CreateSubscription) -> AppResult<Subscription>;

    /// Find a subscription by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>>;

    /// Find the most recent active-flagged subscription for (member, plan).
    async fn find_latest_active(
        &self,
        member_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<Option<Subscription>>;

    /// Push a subscription's end date out and force it active.
    async fn extend(&self, id: Uuid, new_end: DateTime<Utc>) -> AppResult<Subscription>;

    /// Cancel (deactivate, never delete) all active subscriptions for
    /// (member, plan). Returns how many were cancelled.
    async fn cancel_for_member_plan(&self, member_id: Uuid, plan_id: Uuid) -> AppResult<u64>;

    /// List a member's subscriptions, newest first.
    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Subscription>>;
}

/// Payment order backing store.
#[async_trait]
pub trait PaymentOrderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new order in state `pendiente`.
    async fn insert(&self, data: &CreatePaymentOrder) -> AppResult<PaymentOrder>;

    /// Find an order by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentOrder>>;

    /// Record the stored receipt path and move the order to `en_revision`,
    /// guarded on the current state still being in `from`. Returns `None`
    /// when the guard fails (the state moved concurrently).
    async fn attach_receipt(
        &self,
        id: Uuid,
        receipt_path: &str,
        from: &[PaymentOrderStatus],
    ) -> AppResult<Option<PaymentOrder>>;

    /// Transition the order to a resolved state, guarded on the current
    /// state still being in `from`. Returns `None` when the guard fails.
    async fn transition(
        &self,
        id: Uuid,
        from: &[PaymentOrderStatus],
        to: PaymentOrderStatus,
        notes: Option<&str>,
        resolved_at: DateTime<Utc>,
    ) -> AppResult<Option<PaymentOrder>>;

    /// Mark every unresolved order past its deadline `expirado`. Returns
    /// how many orders were expired.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// List a member's orders, newest first.
    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>>;

    /// List orders in a given state, oldest first (review queue order).
    async fn list_by_status(
        &self,
        status: PaymentOrderStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>>;
}
