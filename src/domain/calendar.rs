//! Calendar key value object.
//!
//! Exactly two calendars exist. They are configured independently but
//! book against the same physical room, so neither can be treated in
//! isolation when computing occupancy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

/// Identifies one of the two booking calendars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKey {
    Primary,
    Partner,
}

impl CalendarKey {
    /// Both calendars, in a fixed order.
    pub const ALL: [CalendarKey; 2] = [CalendarKey::Primary, CalendarKey::Partner];

    /// Returns the wire/storage string for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarKey::Primary => "primary",
            CalendarKey::Partner => "partner",
        }
    }

    /// Returns the other calendar.
    pub fn other(&self) -> CalendarKey {
        match self {
            CalendarKey::Primary => CalendarKey::Partner,
            CalendarKey::Partner => CalendarKey::Primary,
        }
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CalendarKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(CalendarKey::Primary),
            "partner" => Ok(CalendarKey::Partner),
            other => Err(ValidationError::invalid_format(
                "calendar",
                format!("unknown calendar key '{}'", other),
            )),
        }
    }
}
