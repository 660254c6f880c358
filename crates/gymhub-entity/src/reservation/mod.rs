//! Subscription-to-slot reservation entity.

pub mod model;

pub use model::Reservation;
