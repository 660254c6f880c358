//! # gymhub-database
//!
//! PostgreSQL connection management, embedded migrations, the store traits
//! the services depend on, and their Pg repository implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod stores;
