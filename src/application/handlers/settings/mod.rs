//! Settings handlers (admin surface).

mod get_settings;
mod update_settings;

pub use get_settings::{CalendarSettings, GetSettingsHandler};
pub use update_settings::{UpdateSettingsCommand, UpdateSettingsHandler};
