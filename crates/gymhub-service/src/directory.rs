//! Read-only directory lookups for the back office: members, rooms, plans.
//!
//! Directory CRUD is owned elsewhere; the engine only reads these tables to
//! validate references and render the calendar.

use std::sync::Arc;

use uuid::Uuid;

use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::pagination::{PageRequest, PageResponse};
use gymhub_database::stores::{MemberStore, PlanStore, RoomStore};
use gymhub_entity::member::Member;
use gymhub_entity::plan::Plan;
use gymhub_entity::room::Room;

/// Read access to the member, room, and plan directories.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    members: Arc<dyn MemberStore>,
    rooms: Arc<dyn RoomStore>,
    plans: Arc<dyn PlanStore>,
}

impl DirectoryService {
    /// Creates a new directory service.
    pub fn new(
        members: Arc<dyn MemberStore>,
        rooms: Arc<dyn RoomStore>,
        plans: Arc<dyn PlanStore>,
    ) -> Self {
        Self {
            members,
            rooms,
            plans,
        }
    }

    /// Fetches a member.
    pub async fn get_member(&self, id: Uuid) -> AppResult<Member> {
        self.members
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Member {id} not found")))
    }

    /// Lists active members.
    pub async fn list_members(&self, page: &PageRequest) -> AppResult<PageResponse<Member>> {
        self.members.list_active(page).await
    }

    /// Lists rooms in service.
    pub async fn list_rooms(&self, page: &PageRequest) -> AppResult<PageResponse<Room>> {
        self.rooms.list_active(page).await
    }

    /// Lists plans currently sold.
    pub async fn list_plans(&self, page: &PageRequest) -> AppResult<PageResponse<Plan>> {
        self.plans.list_active(page).await
    }
}
