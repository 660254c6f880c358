//! # gymhub-api
//!
//! HTTP API layer for GymHub built on Axum.
//!
//! Provides the REST endpoints for the scheduling and reservation engine,
//! request/response DTOs, pagination extraction, request logging, CORS, and
//! the mapping from domain errors to HTTP status codes.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
