//! PostgreSQL implementation of SettingsStore.
//!
//! One settings row per calendar, stored in that calendar's own
//! database so each legacy installation stays self-contained.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::{CalendarKey, DomainError, ErrorCode};
use crate::ports::SettingsStore;

/// PostgreSQL implementation of SettingsStore.
#[derive(Clone)]
pub struct PostgresSettingsStore {
    primary: PgPool,
    partner: PgPool,
}

impl PostgresSettingsStore {
    /// Creates a store over both calendars' pools.
    pub fn new(primary: PgPool, partner: PgPool) -> Self {
        Self { primary, partner }
    }

    fn pool(&self, calendar: CalendarKey) -> &PgPool {
        match calendar {
            CalendarKey::Primary => &self.primary,
            CalendarKey::Partner => &self.partner,
        }
    }
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    async fn fetch(&self, calendar: CalendarKey) -> Result<Option<String>, DomainError> {
        let row = sqlx::query("SELECT payload FROM calendar_settings WHERE calendar_key = $1")
            .bind(calendar.as_str())
            .fetch_optional(self.pool(calendar))
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch settings: {}", e),
                )
            })?;

        match row {
            Some(row) => {
                let payload: String = row.try_get("payload").map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to get payload: {}", e),
                    )
                })?;
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, calendar: CalendarKey, payload: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO calendar_settings (calendar_key, payload, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (calendar_key)
            DO UPDATE SET payload = EXCLUDED.payload, updated_at = now()
            "#,
        )
        .bind(calendar.as_str())
        .bind(payload)
        .execute(self.pool(calendar))
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert settings: {}", e),
            )
        })?;

        Ok(())
    }
}
