//! Calendar configuration store.
//!
//! Wraps the raw [`SettingsStore`] port with defaulting and
//! normalization. Loading never fails: a missing row, a corrupt
//! payload or an unreachable store all degrade to the built-in
//! defaults so the public booking page stays up.

use std::sync::Arc;

use crate::domain::scheduling::{CalendarConfig, CalendarConfigData};
use crate::domain::{CalendarKey, DomainError, ErrorCode};
use crate::ports::SettingsStore;

pub struct CalendarConfigStore {
    store: Arc<dyn SettingsStore>,
}

impl CalendarConfigStore {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Loads a calendar's configuration, always succeeding.
    pub async fn load(&self, calendar: CalendarKey) -> CalendarConfig {
        let raw = match self.store.fetch(calendar).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(calendar = %calendar, error = %e, "Settings fetch failed, using defaults");
                return CalendarConfig::default();
            }
        };

        match raw {
            Some(payload) => match serde_json::from_str::<CalendarConfigData>(&payload) {
                Ok(data) => data.into_config(),
                Err(e) => {
                    tracing::warn!(calendar = %calendar, error = %e, "Malformed stored settings, using defaults");
                    CalendarConfig::default()
                }
            },
            None => CalendarConfig::default(),
        }
    }

    /// Normalizes and persists a calendar's configuration, returning
    /// what was actually stored.
    pub async fn save(
        &self,
        calendar: CalendarKey,
        config: CalendarConfig,
    ) -> Result<CalendarConfig, DomainError> {
        let normalized = config.normalized();
        let payload = serde_json::to_string(&CalendarConfigData::from_config(&normalized))
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to serialize settings: {}", e),
                )
            })?;
        self.store.upsert(calendar, &payload).await?;
        Ok(normalized)
    }
}
