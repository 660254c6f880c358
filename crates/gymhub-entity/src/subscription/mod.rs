//! Subscription entity.

pub mod model;

pub use model::Subscription;
