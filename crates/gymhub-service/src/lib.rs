//! # gymhub-service
//!
//! Business logic service layer for GymHub. Each service orchestrates the
//! store traits to implement one engine concern: the weekly schedule, live
//! capacity, the reservation ledger, check-in recording, and the payment
//! order state machine.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references, with stores behind trait
//! objects so tests can run against in-memory doubles.

pub mod capacity;
pub mod checkin;
pub mod directory;
pub mod payment;
pub mod reservation;
pub mod schedule;

#[cfg(test)]
pub(crate) mod testing;

pub use capacity::{CapacityService, SlotAvailability};
pub use checkin::CheckInService;
pub use directory::DirectoryService;
pub use payment::PaymentOrderService;
pub use reservation::ReservationService;
pub use schedule::ScheduleService;
