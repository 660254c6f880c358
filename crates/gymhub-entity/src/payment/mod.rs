//! Payment order entity.

pub mod model;
pub mod status;

pub use model::PaymentOrder;
pub use status::PaymentOrderStatus;
