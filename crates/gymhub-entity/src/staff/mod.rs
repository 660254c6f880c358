//! Staff (instructor) entity.

pub mod model;

pub use model::Staff;
