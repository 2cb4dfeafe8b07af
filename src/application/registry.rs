//! Calendar contexts and their registry.
//!
//! A context bundles everything that belongs to one calendar: its key,
//! display label and the adapters for its own storage. Both contexts
//! are built once at startup and never change.

use std::sync::Arc;

use crate::domain::CalendarKey;
use crate::ports::{DirectoryReader, ProfileSync, SessionStore};

/// One calendar's identity and storage seams.
#[derive(Clone)]
pub struct CalendarContext {
    pub key: CalendarKey,
    pub label: String,
    pub sessions: Arc<dyn SessionStore>,
    pub directory: Arc<dyn DirectoryReader>,
    pub profiles: Arc<dyn ProfileSync>,
}

impl CalendarContext {
    pub fn new(
        key: CalendarKey,
        label: impl Into<String>,
        sessions: Arc<dyn SessionStore>,
        directory: Arc<dyn DirectoryReader>,
        profiles: Arc<dyn ProfileSync>,
    ) -> Self {
        Self {
            key,
            label: label.into(),
            sessions,
            directory,
            profiles,
        }
    }
}

/// Immutable holder of both calendar contexts.
#[derive(Clone)]
pub struct CalendarRegistry {
    primary: CalendarContext,
    partner: CalendarContext,
}

impl CalendarRegistry {
    /// Builds the registry. The contexts must carry their own keys.
    pub fn new(primary: CalendarContext, partner: CalendarContext) -> Self {
        debug_assert_eq!(primary.key, CalendarKey::Primary);
        debug_assert_eq!(partner.key, CalendarKey::Partner);
        Self { primary, partner }
    }

    /// The context for a calendar key.
    pub fn context(&self, key: CalendarKey) -> &CalendarContext {
        match key {
            CalendarKey::Primary => &self.primary,
            CalendarKey::Partner => &self.partner,
        }
    }

    /// Both session stores, for shared-capacity aggregation.
    pub fn session_stores(&self) -> Vec<Arc<dyn SessionStore>> {
        vec![
            Arc::clone(&self.primary.sessions),
            Arc::clone(&self.partner.sessions),
        ]
    }
}
