//! # gymhub-storage
//!
//! Receipt file storage for GymHub. Payment receipts land on the local
//! filesystem under a configured root; orders only ever hold the relative
//! path.

pub mod local;

pub use local::LocalReceiptStorage;
