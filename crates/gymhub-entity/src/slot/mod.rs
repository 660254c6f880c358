//! Recurring weekly slot template entity.

pub mod model;
pub mod weekday;

pub use model::SlotTemplate;
pub use weekday::Weekday;
