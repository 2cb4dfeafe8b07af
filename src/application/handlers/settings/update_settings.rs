//! UpdateSettingsHandler - validate and persist one calendar's configuration.

use std::sync::Arc;

use crate::application::config_store::CalendarConfigStore;
use crate::domain::scheduling::CalendarConfig;
use crate::domain::{CalendarKey, DomainError};

/// Command to replace a calendar's configuration.
#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub calendar: CalendarKey,
    pub config: CalendarConfig,
}

/// Handler for settings updates.
pub struct UpdateSettingsHandler {
    config_store: Arc<CalendarConfigStore>,
}

impl UpdateSettingsHandler {
    pub fn new(config_store: Arc<CalendarConfigStore>) -> Self {
        Self { config_store }
    }

    /// Persists the configuration, returning the normalized form that
    /// was actually stored.
    pub async fn handle(&self, cmd: UpdateSettingsCommand) -> Result<CalendarConfig, DomainError> {
        let stored = self.config_store.save(cmd.calendar, cmd.config).await?;
        tracing::info!(calendar = %cmd.calendar, "Calendar settings updated");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::settings_store_with;

    #[tokio::test]
    async fn persists_the_clamped_configuration() {
        let handler = UpdateSettingsHandler::new(Arc::new(settings_store_with(
            CalendarConfig::default(),
        )));
        let cmd = UpdateSettingsCommand {
            calendar: CalendarKey::Partner,
            config: CalendarConfig {
                slot_minutes: 1000,
                ..CalendarConfig::default()
            },
        };
        let stored = handler.handle(cmd).await.unwrap();
        assert_eq!(stored.slot_minutes, 240);
    }
}
