//! Settings store port.
//!
//! Persists one raw settings payload per calendar key. Parsing and
//! defaulting are deliberately not part of this contract: the
//! application layer must stay functional whatever this store returns,
//! so it receives the payload verbatim and degrades gracefully itself.

use async_trait::async_trait;

use crate::domain::{CalendarKey, DomainError};

/// Raw per-calendar settings persistence.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the stored payload for a calendar, if any.
    async fn fetch(&self, calendar: CalendarKey) -> Result<Option<String>, DomainError>;

    /// Create or replace the stored payload for a calendar.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, calendar: CalendarKey, payload: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SettingsStore) {}
    }
}
