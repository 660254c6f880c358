//! Member (socio) entity.

pub mod model;

pub use model::Member;
