//! Check-in origin enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gymhub_core::AppError;

/// Where a check-in was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "checkin_origin", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CheckInOrigin {
    /// Recorded at the front desk (the default).
    #[default]
    Reception,
    /// Recorded from the member-facing app.
    App,
    /// Recorded by a turnstile or access device.
    Device,
}

impl CheckInOrigin {
    /// Return the origin as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reception => "reception",
            Self::App => "app",
            Self::Device => "device",
        }
    }
}

impl fmt::Display for CheckInOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckInOrigin {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reception" => Ok(Self::Reception),
            "app" => Ok(Self::App),
            "device" => Ok(Self::Device),
            _ => Err(AppError::validation(format!(
                "Invalid check-in origin: '{s}'. Expected one of: reception, app, device"
            ))),
        }
    }
}
