//! # gymhub-entity
//!
//! Domain entity models for GymHub: members, staff, rooms, plans, recurring
//! slot templates, reservations, check-ins, subscriptions, and payment
//! orders. Pure domain rules (interval overlap, status-transition legality,
//! monotonic subscription extension) live on the models themselves.

pub mod checkin;
pub mod member;
pub mod payment;
pub mod plan;
pub mod reservation;
pub mod room;
pub mod slot;
pub mod staff;
pub mod subscription;
