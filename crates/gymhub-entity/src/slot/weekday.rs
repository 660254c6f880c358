//! Weekday enumeration for recurring slot templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gymhub_core::AppError;

/// Day of the week a recurring slot runs on. Stored as 0 (Sunday) through
/// 6 (Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Weekday {
    /// Sunday (0).
    Sunday = 0,
    /// Monday (1).
    Monday = 1,
    /// Tuesday (2).
    Tuesday = 2,
    /// Wednesday (3).
    Wednesday = 3,
    /// Thursday (4).
    Thursday = 4,
    /// Friday (5).
    Friday = 5,
    /// Saturday (6).
    Saturday = 6,
}

impl Weekday {
    /// The numeric index, 0 (Sunday) through 6 (Saturday).
    pub fn index(&self) -> i16 {
        *self as i16
    }

    /// Lowercase English name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Weekday> for i16 {
    fn from(day: Weekday) -> i16 {
        day as i16
    }
}

impl TryFrom<i16> for Weekday {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sunday),
            1 => Ok(Self::Monday),
            2 => Ok(Self::Tuesday),
            3 => Ok(Self::Wednesday),
            4 => Ok(Self::Thursday),
            5 => Ok(Self::Friday),
            6 => Ok(Self::Saturday),
            other => Err(AppError::validation(format!(
                "Invalid weekday: {other}. Expected 0 (Sunday) through 6 (Saturday)"
            ))),
        }
    }
}

impl FromStr for Weekday {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.parse::<i16>() {
            return Self::try_from(index);
        }
        match s.to_lowercase().as_str() {
            "sunday" => Ok(Self::Sunday),
            "monday" => Ok(Self::Monday),
            "tuesday" => Ok(Self::Tuesday),
            "wednesday" => Ok(Self::Wednesday),
            "thursday" => Ok(Self::Thursday),
            "friday" => Ok(Self::Friday),
            "saturday" => Ok(Self::Saturday),
            _ => Err(AppError::validation(format!("Invalid weekday: '{s}'"))),
        }
    }
}
