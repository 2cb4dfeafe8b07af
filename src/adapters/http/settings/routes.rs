//! HTTP routes for settings endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_settings, put_settings, SettingsHandlers};

/// Creates the settings router.
pub fn settings_routes(handlers: SettingsHandlers) -> Router {
    Router::new()
        .route("/settings", get(get_settings).put(put_settings))
        .with_state(handlers)
}
