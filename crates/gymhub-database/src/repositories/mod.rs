//! PostgreSQL repository implementations of the store traits.

pub mod checkin;
pub mod member;
pub mod payment_order;
pub mod plan;
pub mod reservation;
pub mod room;
pub mod slot;
pub mod staff;
pub mod subscription;
