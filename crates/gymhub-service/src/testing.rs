//! In-memory store doubles for the service test suites.
//!
//! Every trait implementation keeps its rows in a `Mutex<Vec<_>>` and
//! mirrors the Pg repositories' semantics, including the atomicity of the
//! guarded operations (the mutex plays the role of the advisory lock).

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::traits::storage::ReceiptStorage;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_database::stores::{
    CheckInStore, MemberStore, PaymentOrderStore, PlanStore, ReservationStore, RoomStore,
    SlotTemplateStore, StaffStore, SubscriptionStore,
};
use gymhub_entity::checkin::model::CreateCheckIn;
use gymhub_entity::checkin::CheckIn;
use gymhub_entity::member::Member;
use gymhub_entity::payment::model::CreatePaymentOrder;
use gymhub_entity::payment::{PaymentOrder, PaymentOrderStatus};
use gymhub_entity::plan::{Plan, WeeklyQuota};
use gymhub_entity::reservation::Reservation;
use gymhub_entity::room::Room;
use gymhub_entity::slot::model::{CreateSlotTemplate, UpdateSlotTemplate};
use gymhub_entity::slot::{SlotTemplate, Weekday};
use gymhub_entity::subscription::model::CreateSubscription;
use gymhub_entity::subscription::Subscription;

/// A fixed instant all the suites can anchor to (a Monday).
pub fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
}

fn paginate<T: Clone + serde::Serialize>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let window = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    PageResponse::new(window, page.page, page.page_size, total)
}

pub fn member(active: bool) -> Member {
    Member {
        id: Uuid::new_v4(),
        full_name: "Ana Suarez".to_string(),
        email: None,
        active,
        created_at: anchor(),
    }
}

pub fn staff() -> gymhub_entity::staff::Staff {
    gymhub_entity::staff::Staff {
        id: Uuid::new_v4(),
        full_name: "Coach Diaz".to_string(),
        active: true,
        created_at: anchor(),
    }
}

pub fn room(capacity: i32) -> Room {
    Room {
        id: Uuid::new_v4(),
        name: "Sala A".to_string(),
        capacity,
        active: true,
        created_at: anchor(),
    }
}

pub fn plan(quota: WeeklyQuota) -> Plan {
    Plan {
        id: Uuid::new_v4(),
        name: format!("{quota} dias"),
        weekly_quota: quota,
        price_cents: 150_00,
        active: true,
        created_at: anchor(),
    }
}

pub fn slot(room_id: Uuid, instructor_id: Uuid, weekday: Weekday, hhmm: (u32, u32)) -> SlotTemplate {
    SlotTemplate {
        id: Uuid::new_v4(),
        room_id,
        instructor_id,
        weekday,
        start_time: chrono::NaiveTime::from_hms_opt(hhmm.0, hhmm.1, 0).unwrap(),
        duration_minutes: 60,
        capacity: 10,
        active: true,
        created_at: anchor(),
        updated_at: anchor(),
    }
}

pub fn subscription(member_id: Uuid, plan_id: Uuid, now: DateTime<Utc>) -> Subscription {
    Subscription {
        id: Uuid::new_v4(),
        member_id,
        plan_id,
        payment_order_id: None,
        starts_at: now - chrono::Duration::days(1),
        ends_at: now + chrono::Duration::days(29),
        active: true,
        created_at: now,
    }
}

#[derive(Debug, Default)]
pub struct InMemoryMembers {
    pub rows: Mutex<Vec<Member>>,
}

impl InMemoryMembers {
    pub fn with(rows: Vec<Member>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl MemberStore for InMemoryMembers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>> {
        Ok(self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn exists(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|m| m.id == id))
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Member>> {
        let rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.active)
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStaff {
    pub rows: Mutex<Vec<gymhub_entity::staff::Staff>>,
}

impl InMemoryStaff {
    pub fn with(rows: Vec<gymhub_entity::staff::Staff>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl StaffStore for InMemoryStaff {
    async fn exists_active(&self, id: Uuid) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.id == id && s.active))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRooms {
    pub rows: Mutex<Vec<Room>>,
}

impl InMemoryRooms {
    pub fn with(rows: Vec<Room>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl RoomStore for InMemoryRooms {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Room>> {
        let rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPlans {
    pub rows: Mutex<Vec<Plan>>,
}

impl InMemoryPlans {
    pub fn with(rows: Vec<Plan>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl PlanStore for InMemoryPlans {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Plan>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<PageResponse<Plan>> {
        let rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }
}

#[derive(Debug, Default)]
pub struct InMemorySlots {
    pub rows: Mutex<Vec<SlotTemplate>>,
}

impl InMemorySlots {
    pub fn with(rows: Vec<SlotTemplate>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn overlap_conflict(conflicting: &SlotTemplate) -> AppError {
        AppError::conflict(format!(
            "Slot overlaps template {} ({} {} in the same room)",
            conflicting.id, conflicting.weekday, conflicting.start_time
        ))
    }
}

#[async_trait]
impl SlotTemplateStore for InMemorySlots {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SlotTemplate>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn list_active(&self) -> AppResult<Vec<SlotTemplate>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect();
        rows.sort_by_key(|s| (s.weekday.index(), s.start_time));
        Ok(rows)
    }

    async fn list_by_weekday(&self, weekday: Weekday) -> AppResult<Vec<SlotTemplate>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.active && s.weekday == weekday)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.start_time);
        Ok(rows)
    }

    async fn create(&self, data: &CreateSlotTemplate, capacity: i32) -> AppResult<SlotTemplate> {
        let mut rows = self.rows.lock().unwrap();
        let candidate = SlotTemplate {
            id: Uuid::new_v4(),
            room_id: data.room_id,
            instructor_id: data.instructor_id,
            weekday: data.weekday,
            start_time: data.start_time,
            duration_minutes: data.duration_minutes,
            capacity,
            active: true,
            created_at: anchor(),
            updated_at: anchor(),
        };
        if let Some(conflicting) = rows.iter().find(|s| s.active && s.conflicts_with(&candidate)) {
            return Err(Self::overlap_conflict(conflicting));
        }
        rows.push(candidate.clone());
        Ok(candidate)
    }

    async fn update(&self, data: &UpdateSlotTemplate) -> AppResult<SlotTemplate> {
        let mut rows = self.rows.lock().unwrap();
        let current = rows
            .iter()
            .find(|s| s.id == data.id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Slot template {} not found", data.id)))?;

        let mut updated = current.clone();
        if let Some(instructor_id) = data.instructor_id {
            updated.instructor_id = instructor_id;
        }
        if let Some(weekday) = data.weekday {
            updated.weekday = weekday;
        }
        if let Some(start_time) = data.start_time {
            updated.start_time = start_time;
        }
        if let Some(duration_minutes) = data.duration_minutes {
            updated.duration_minutes = duration_minutes;
        }
        if let Some(capacity) = data.capacity {
            updated.capacity = capacity;
        }

        if let Some(conflicting) = rows
            .iter()
            .find(|s| s.active && s.id != updated.id && s.conflicts_with(&updated))
        {
            return Err(Self::overlap_conflict(conflicting));
        }

        let row = rows
            .iter_mut()
            .find(|s| s.id == data.id)
            .ok_or_else(|| AppError::not_found(format!("Slot template {} not found", data.id)))?;
        *row = updated.clone();
        Ok(updated)
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|s| s.id == id) {
            Some(row) => {
                row.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReservations {
    pub rows: Mutex<Vec<Reservation>>,
    /// Subscriptions visible to current-count queries (the Pg repositories
    /// join through the subscriptions table).
    pub subscriptions: Mutex<Vec<Subscription>>,
}

impl InMemoryReservations {
    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(subscriptions),
        }
    }

    fn current_count(&self, slot_template_id: Uuid, now: DateTime<Utc>) -> i64 {
        let subscriptions = self.subscriptions.lock().unwrap();
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.slot_template_id == slot_template_id)
            .filter(|r| {
                subscriptions
                    .iter()
                    .any(|s| s.id == r.subscription_id && s.is_current(now))
            })
            .count() as i64
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservations {
    async fn insert_if_capacity(
        &self,
        subscription_id: Uuid,
        slot_template_id: Uuid,
        capacity: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Reservation>> {
        if self.current_count(slot_template_id, now) >= i64::from(capacity) {
            return Ok(None);
        }
        let reservation = Reservation {
            id: Uuid::new_v4(),
            subscription_id,
            slot_template_id,
            created_at: now,
        };
        self.rows.lock().unwrap().push(reservation.clone());
        Ok(Some(reservation))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_for_subscription_slot(
        &self,
        subscription_id: Uuid,
        slot_template_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.subscription_id == subscription_id && r.slot_template_id == slot_template_id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn count_current_for_slot(
        &self,
        slot_template_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<i64> {
        Ok(self.current_count(slot_template_id, now))
    }

    async fn count_current_for_slots(
        &self,
        slot_template_ids: &[Uuid],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<(Uuid, i64)>> {
        Ok(slot_template_ids
            .iter()
            .map(|&id| (id, self.current_count(id, now)))
            .filter(|(_, n)| *n > 0)
            .collect())
    }

    async fn count_for_subscription(&self, subscription_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.subscription_id == subscription_id)
            .count() as i64)
    }

    async fn exists_for_member_slot(
        &self,
        member_id: Uuid,
        slot_template_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.slot_template_id == slot_template_id)
            .any(|r| {
                subscriptions
                    .iter()
                    .any(|s| s.id == r.subscription_id && s.member_id == member_id && s.is_current(now))
            }))
    }

    async fn list_for_subscription(&self, subscription_id: Uuid) -> AppResult<Vec<Reservation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.subscription_id == subscription_id)
            .cloned()
            .collect())
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Reservation>> {
        let subscriptions = self.subscriptions.lock().unwrap();
        let rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                subscriptions
                    .iter()
                    .any(|s| s.id == r.subscription_id && s.member_id == member_id)
            })
            .cloned()
            .collect();
        Ok(paginate(rows, page))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCheckIns {
    pub rows: Mutex<Vec<CheckIn>>,
}

#[async_trait]
impl CheckInStore for InMemoryCheckIns {
    async fn insert(&self, data: &CreateCheckIn) -> AppResult<CheckIn> {
        let checkin = CheckIn {
            id: Uuid::new_v4(),
            member_id: data.member_id,
            slot_template_id: data.slot_template_id,
            checked_in_at: data.checked_in_at,
            origin: data.origin,
        };
        self.rows.lock().unwrap().push(checkin.clone());
        Ok(checkin)
    }

    async fn exists_on_day(
        &self,
        member_id: Uuid,
        slot_template_id: Option<Uuid>,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> AppResult<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|c| {
            c.member_id == member_id
                && c.slot_template_id == slot_template_id
                && c.checked_in_at >= day_start
                && c.checked_in_at < day_end
        }))
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.member_id == member_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| std::cmp::Reverse(c.checked_in_at));
        Ok(paginate(rows, page))
    }

    async fn list_for_slot(
        &self,
        slot_template_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CheckIn>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.slot_template_id == Some(slot_template_id))
            .cloned()
            .collect();
        rows.sort_by_key(|c| std::cmp::Reverse(c.checked_in_at));
        Ok(paginate(rows, page))
    }
}

#[derive(Debug, Default)]
pub struct InMemorySubscriptions {
    pub rows: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptions {
    pub fn with(rows: Vec<Subscription>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptions {
    async fn insert(&self, data: &CreateSubscription) -> AppResult<Subscription> {
        let subscription = Subscription {
            id: Uuid::new_v4(),
            member_id: data.member_id,
            plan_id: data.plan_id,
            payment_order_id: data.payment_order_id,
            starts_at: data.starts_at,
            ends_at: data.ends_at,
            active: true,
            created_at: data.starts_at,
        };
        self.rows.lock().unwrap().push(subscription.clone());
        Ok(subscription)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_latest_active(
        &self,
        member_id: Uuid,
        plan_id: Uuid,
    ) -> AppResult<Option<Subscription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.member_id == member_id && s.plan_id == plan_id && s.active)
            .max_by_key(|s| s.ends_at)
            .cloned())
    }

    async fn extend(&self, id: Uuid, new_end: DateTime<Utc>) -> AppResult<Subscription> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found(format!("Subscription {id} not found")))?;
        row.ends_at = new_end;
        row.active = true;
        Ok(row.clone())
    }

    async fn cancel_for_member_plan(&self, member_id: Uuid, plan_id: Uuid) -> AppResult<u64> {
        let mut cancelled = 0;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.member_id == member_id && row.plan_id == plan_id && row.active {
                row.active = false;
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Subscription>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.member_id == member_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| std::cmp::Reverse(s.created_at));
        Ok(paginate(rows, page))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPaymentOrders {
    pub rows: Mutex<Vec<PaymentOrder>>,
}

impl InMemoryPaymentOrders {
    pub fn with(rows: Vec<PaymentOrder>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl PaymentOrderStore for InMemoryPaymentOrders {
    async fn insert(&self, data: &CreatePaymentOrder) -> AppResult<PaymentOrder> {
        let order = PaymentOrder {
            id: Uuid::new_v4(),
            member_id: data.member_id,
            plan_id: data.plan_id,
            amount_cents: data.amount_cents,
            status: PaymentOrderStatus::Pendiente,
            receipt_path: None,
            resolution_notes: None,
            created_at: anchor(),
            expires_at: data.expires_at,
            resolved_at: None,
        };
        self.rows.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PaymentOrder>> {
        Ok(self.rows.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn attach_receipt(
        &self,
        id: Uuid,
        receipt_path: &str,
        from: &[PaymentOrderStatus],
    ) -> AppResult<Option<PaymentOrder>> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|o| o.id == id && from.contains(&o.status))
        {
            Some(row) => {
                row.receipt_path = Some(receipt_path.to_string());
                row.status = PaymentOrderStatus::EnRevision;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn transition(
        &self,
        id: Uuid,
        from: &[PaymentOrderStatus],
        to: PaymentOrderStatus,
        notes: Option<&str>,
        resolved_at: DateTime<Utc>,
    ) -> AppResult<Option<PaymentOrder>> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|o| o.id == id && from.contains(&o.status))
        {
            Some(row) => {
                row.status = to;
                if let Some(notes) = notes {
                    row.resolution_notes = Some(notes.to_string());
                }
                row.resolved_at = Some(resolved_at);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut expired = 0;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.status.can_expire() && row.expires_at < now {
                row.status = PaymentOrderStatus::Expirado;
                row.resolved_at = Some(now);
                expired += 1;
            }
        }
        Ok(expired)
    }

    async fn list_for_member(
        &self,
        member_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.member_id == member_id)
            .cloned()
            .collect();
        rows.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(paginate(rows, page))
    }

    async fn list_by_status(
        &self,
        status: PaymentOrderStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<PaymentOrder>> {
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        rows.sort_by_key(|o| o.created_at);
        Ok(paginate(rows, page))
    }
}

/// Receipt storage that records saved paths without touching the disk.
#[derive(Debug, Default)]
pub struct InMemoryReceipts {
    pub saved: Mutex<Vec<String>>,
}

#[async_trait]
impl ReceiptStorage for InMemoryReceipts {
    async fn save(&self, _data: Bytes, filename: &str, namespace: &str) -> AppResult<String> {
        let path = format!("{namespace}/{filename}");
        self.saved.lock().unwrap().push(path.clone());
        Ok(path)
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.saved.lock().unwrap().iter().any(|p| p == path))
    }
}
