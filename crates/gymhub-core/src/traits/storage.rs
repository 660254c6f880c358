//! Receipt storage collaborator interface.
//!
//! Proof-of-payment uploads are the only file I/O in the system. The trait
//! is defined here in `gymhub-core` and implemented in `gymhub-storage`;
//! the payment service invokes it *before* moving an order to review, so a
//! failed upload never leaves a state transition behind.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Backend that persists uploaded payment receipts.
#[async_trait]
pub trait ReceiptStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Store the uploaded bytes under the given namespace (typically the
    /// payment order id) and return the stored path.
    async fn save(&self, data: Bytes, filename: &str, namespace: &str) -> AppResult<String>;

    /// Check whether a stored receipt exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
