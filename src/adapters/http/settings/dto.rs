//! HTTP DTOs for settings endpoints.
//!
//! The configuration payload reuses the storage wire form: what the
//! admin UI edits is exactly what gets persisted.

use serde::{Deserialize, Serialize};

use crate::application::handlers::settings::CalendarSettings;
use crate::domain::scheduling::CalendarConfigData;
use crate::domain::CalendarKey;

/// Both calendars' configurations.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub primary: CalendarConfigData,
    pub partner: CalendarConfigData,
}

impl SettingsResponse {
    pub fn from_settings(settings: Vec<CalendarSettings>) -> Self {
        let mut primary = CalendarConfigData::default();
        let mut partner = CalendarConfigData::default();
        for entry in settings {
            let data = CalendarConfigData::from_config(&entry.config);
            match entry.calendar {
                CalendarKey::Primary => primary = data,
                CalendarKey::Partner => partner = data,
            }
        }
        Self { primary, partner }
    }
}

/// Request to replace one calendar's configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub calendar: Option<String>,
    pub config: CalendarConfigData,
}

/// Response after an update: the configuration as stored.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateSettingsResponse {
    pub calendar: CalendarKey,
    pub config: CalendarConfigData,
}
