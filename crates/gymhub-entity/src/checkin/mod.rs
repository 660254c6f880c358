//! Attendance check-in entity.

pub mod model;
pub mod origin;

pub use model::CheckIn;
pub use origin::CheckInOrigin;
