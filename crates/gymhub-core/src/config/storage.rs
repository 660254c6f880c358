//! Receipt storage configuration.

use serde::{Deserialize, Serialize};

/// Local-disk receipt storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptStorageConfig {
    /// Root directory for stored receipts.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for ReceiptStorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

fn default_root() -> String {
    "data/receipts".to_string()
}
