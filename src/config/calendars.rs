//! Per-calendar configuration
//!
//! Each calendar has its own database, its own brand label, the host
//! patterns that authorize its embedded page, and its own sender
//! identity for confirmation mails.

use serde::Deserialize;

use crate::domain::CalendarKey;

use super::error::ValidationError;

/// Configuration for one calendar.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarSection {
    /// PostgreSQL connection URL for this calendar's database
    pub database_url: String,

    /// Brand label shown in notifications
    #[serde(default)]
    pub label: String,

    /// Host substrings that authorize this calendar (comma-separated)
    pub hosts: Option<String>,

    /// From address for confirmation mails
    pub from_email: String,

    /// From display name for confirmation mails
    #[serde(default)]
    pub from_name: String,
}

impl CalendarSection {
    /// Get host patterns as a vector
    pub fn hosts_list(&self) -> Vec<String> {
        self.hosts
            .as_ref()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        if self.from_name.is_empty() {
            self.from_email.clone()
        } else {
            format!("{} <{}>", self.from_name, self.from_email)
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), ValidationError> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(ValidationError::InvalidDatabaseUrl(name));
        }
        if self.hosts_list().iter().all(|h| h.is_empty()) {
            return Err(ValidationError::NoHostPatterns(name));
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail(name));
        }
        Ok(())
    }
}

/// Both calendars' configuration sections.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarsConfig {
    pub primary: CalendarSection,
    pub partner: CalendarSection,
}

impl CalendarsConfig {
    /// The section for a calendar key.
    pub fn section(&self, calendar: CalendarKey) -> &CalendarSection {
        match calendar {
            CalendarKey::Primary => &self.primary,
            CalendarKey::Partner => &self.partner,
        }
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.primary.validate("primary")?;
        self.partner.validate("partner")?;
        Ok(())
    }
}
