//! Membership plan entity.

pub mod model;
pub mod quota;

pub use model::Plan;
pub use quota::WeeklyQuota;
