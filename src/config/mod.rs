//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `EXAMDESK` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use examdesk::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod calendars;
mod email;
mod error;
mod server;

pub use calendars::{CalendarSection, CalendarsConfig};
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Per-calendar configuration (databases, hosts, senders)
    pub calendars: CalendarsConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `EXAMDESK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `EXAMDESK__CALENDARS__PRIMARY__DATABASE_URL=...` ->
    ///   `calendars.primary.database_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are
    /// missing or values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EXAMDESK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.calendars.validate()?;
        self.email.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var(
            "EXAMDESK__CALENDARS__PRIMARY__DATABASE_URL",
            "postgres://test@localhost/primary",
        );
        env::set_var(
            "EXAMDESK__CALENDARS__PRIMARY__HOSTS",
            "drivingschool.example",
        );
        env::set_var(
            "EXAMDESK__CALENDARS__PRIMARY__FROM_EMAIL",
            "noreply@drivingschool.example",
        );
        env::set_var(
            "EXAMDESK__CALENDARS__PARTNER__DATABASE_URL",
            "postgres://test@localhost/partner",
        );
        env::set_var(
            "EXAMDESK__CALENDARS__PARTNER__HOSTS",
            "boatlicense.example",
        );
        env::set_var(
            "EXAMDESK__CALENDARS__PARTNER__FROM_EMAIL",
            "noreply@boatlicense.example",
        );
        env::set_var("EXAMDESK__EMAIL__RESEND_API_KEY", "re_test_xxx");
    }

    fn clear_env() {
        env::remove_var("EXAMDESK__CALENDARS__PRIMARY__DATABASE_URL");
        env::remove_var("EXAMDESK__CALENDARS__PRIMARY__HOSTS");
        env::remove_var("EXAMDESK__CALENDARS__PRIMARY__FROM_EMAIL");
        env::remove_var("EXAMDESK__CALENDARS__PARTNER__DATABASE_URL");
        env::remove_var("EXAMDESK__CALENDARS__PARTNER__HOSTS");
        env::remove_var("EXAMDESK__CALENDARS__PARTNER__FROM_EMAIL");
        env::remove_var("EXAMDESK__EMAIL__RESEND_API_KEY");
        env::remove_var("EXAMDESK__SERVER__PORT");
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("Failed to load config");
        assert_eq!(
            config.calendars.primary.database_url,
            "postgres://test@localhost/primary"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_defaults_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.is_production());
    }

    #[test]
    fn custom_port_overrides_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("EXAMDESK__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }
}
