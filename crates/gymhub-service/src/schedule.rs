//! Weekly schedule service: slot template CRUD under the no-overlap rule.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_database::stores::{RoomStore, SlotTemplateStore, StaffStore};
use gymhub_entity::slot::model::{CreateSlotTemplate, UpdateSlotTemplate};
use gymhub_entity::slot::{SlotTemplate, Weekday};

/// Manages the catalog of recurring weekly slot templates.
///
/// The overlap check itself runs inside the store's guarded create/update so
/// it cannot race; this service owns the reference validation around it.
#[derive(Debug, Clone)]
pub struct ScheduleService {
    slots: Arc<dyn SlotTemplateStore>,
    rooms: Arc<dyn RoomStore>,
    staff: Arc<dyn StaffStore>,
}

impl ScheduleService {
    /// Creates a new schedule service.
    pub fn new(
        slots: Arc<dyn SlotTemplateStore>,
        rooms: Arc<dyn RoomStore>,
        staff: Arc<dyn StaffStore>,
    ) -> Self {
        Self {
            slots,
            rooms,
            staff,
        }
    }

    /// Creates a slot template. Capacity defaults to the room's capacity
    /// when no override is given.
    pub async fn create_slot(&self, req: CreateSlotTemplate) -> AppResult<SlotTemplate> {
        validate_duration(req.duration_minutes)?;
        if let Some(capacity) = req.capacity {
            validate_capacity(capacity)?;
        }

        let room = self
            .rooms
            .find_by_id(req.room_id)
            .await?
            .filter(|r| r.active)
            .ok_or_else(|| AppError::validation(format!("Unknown room: {}", req.room_id)))?;

        if !self.staff.exists_active(req.instructor_id).await? {
            return Err(AppError::validation(format!(
                "Unknown instructor: {}",
                req.instructor_id
            )));
        }

        let capacity = req.capacity.unwrap_or(room.capacity);
        let slot = self.slots.create(&req, capacity).await?;

        info!(
            slot_id = %slot.id,
            room_id = %slot.room_id,
            weekday = %slot.weekday,
            start = %slot.start_time,
            "Created slot template"
        );
        Ok(slot)
    }

    /// Updates a slot template under the same no-overlap rule, excluding
    /// the template's own prior interval.
    pub async fn update_slot(&self, req: UpdateSlotTemplate) -> AppResult<SlotTemplate> {
        if let Some(duration_minutes) = req.duration_minutes {
            validate_duration(duration_minutes)?;
        }
        if let Some(capacity) = req.capacity {
            validate_capacity(capacity)?;
        }
        if let Some(instructor_id) = req.instructor_id {
            if !self.staff.exists_active(instructor_id).await? {
                return Err(AppError::validation(format!(
                    "Unknown instructor: {instructor_id}"
                )));
            }
        }

        let slot = self.slots.update(&req).await?;
        info!(slot_id = %slot.id, "Updated slot template");
        Ok(slot)
    }

    /// Soft-disables a slot template. Reservations and check-ins referencing
    /// it remain as history.
    pub async fn deactivate_slot(&self, id: Uuid) -> AppResult<()> {
        if !self.slots.deactivate(id).await? {
            return Err(AppError::not_found(format!("Slot template {id} not found")));
        }
        info!(slot_id = %id, "Deactivated slot template");
        Ok(())
    }

    /// Fetches a single template.
    pub async fn get_slot(&self, id: Uuid) -> AppResult<SlotTemplate> {
        self.slots
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Slot template {id} not found")))
    }

    /// Lists all active templates ordered by weekday then start time.
    pub async fn list_active(&self) -> AppResult<Vec<SlotTemplate>> {
        self.slots.list_active().await
    }

    /// Lists active templates on one weekday ordered by start time.
    pub async fn list_by_weekday(&self, weekday: Weekday) -> AppResult<Vec<SlotTemplate>> {
        self.slots.list_by_weekday(weekday).await
    }
}

fn validate_duration(duration_minutes: i32) -> AppResult<()> {
    if duration_minutes <= 0 {
        return Err(AppError::validation("Duration must be positive"));
    }
    // A template never spans midnight.
    if duration_minutes > 24 * 60 {
        return Err(AppError::validation("Duration exceeds one day"));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> AppResult<()> {
    if capacity <= 0 {
        return Err(AppError::validation("Capacity must be positive"));
    }
    Ok(())
}
