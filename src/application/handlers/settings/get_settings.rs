//! GetSettingsHandler - both calendars' configurations for the admin UI.

use std::sync::Arc;

use crate::application::config_store::CalendarConfigStore;
use crate::domain::scheduling::CalendarConfig;
use crate::domain::CalendarKey;

/// One calendar's configuration, keyed.
#[derive(Debug, Clone)]
pub struct CalendarSettings {
    pub calendar: CalendarKey,
    pub config: CalendarConfig,
}

/// Handler returning every calendar's configuration.
pub struct GetSettingsHandler {
    config_store: Arc<CalendarConfigStore>,
}

impl GetSettingsHandler {
    pub fn new(config_store: Arc<CalendarConfigStore>) -> Self {
        Self { config_store }
    }

    /// Loads both configurations. Infallible: missing or corrupt rows
    /// surface as defaults.
    pub async fn handle(&self) -> Vec<CalendarSettings> {
        let mut settings = Vec::with_capacity(CalendarKey::ALL.len());
        for calendar in CalendarKey::ALL {
            settings.push(CalendarSettings {
                calendar,
                config: self.config_store.load(calendar).await,
            });
        }
        settings
    }
}
