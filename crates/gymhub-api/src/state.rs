//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use gymhub_core::config::AppConfig;
use gymhub_database::connection::DatabasePool;
use gymhub_service::{
    CapacityService, CheckInService, DirectoryService, PaymentOrderService, ReservationService,
    ScheduleService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, for the health probe.
    pub db: DatabasePool,
    /// Slot template catalog.
    pub schedule_service: Arc<ScheduleService>,
    /// Live capacity calculation.
    pub capacity_service: Arc<CapacityService>,
    /// Reservation ledger.
    pub reservation_service: Arc<ReservationService>,
    /// Check-in recording.
    pub checkin_service: Arc<CheckInService>,
    /// Payment order state machine.
    pub payment_service: Arc<PaymentOrderService>,
    /// Member/room/plan directory reads.
    pub directory_service: Arc<DirectoryService>,
}
