//! HTTP request handlers, one module per domain.

pub mod availability;
pub mod checkin;
pub mod directory;
pub mod health;
pub mod payment;
pub mod reservation;
pub mod slot;
