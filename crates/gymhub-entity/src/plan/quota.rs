//! Weekly class quota enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

use gymhub_core::AppError;

/// Weekly class quota offered by a plan.
///
/// A closed enumeration: the gym sells exactly 2, 3, or 5 classes per
/// week. The quota is the ceiling on how many distinct slot templates a
/// subscription derived from the plan may reserve concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum WeeklyQuota {
    /// Two classes per week.
    Two = 2,
    /// Three classes per week.
    Three = 3,
    /// Five classes per week.
    Five = 5,
}

impl WeeklyQuota {
    /// The maximum number of concurrently reserved slots.
    pub fn classes_per_week(&self) -> i64 {
        *self as i64
    }
}

impl fmt::Display for WeeklyQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as i16)
    }
}

impl From<WeeklyQuota> for i16 {
    fn from(quota: WeeklyQuota) -> i16 {
        quota as i16
    }
}

impl TryFrom<i16> for WeeklyQuota {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            5 => Ok(Self::Five),
            other => Err(AppError::validation(format!(
                "Invalid weekly quota: {other}. Expected one of: 2, 3, 5"
            ))),
        }
    }
}
