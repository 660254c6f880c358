//! # gymhub-core
//!
//! Core crate for GymHub. Contains configuration schemas, the clock
//! abstraction, pagination types, collaborator traits, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other GymHub crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
