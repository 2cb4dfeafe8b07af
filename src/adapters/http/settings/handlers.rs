//! HTTP handlers for settings endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{bad_request, error_response};
use crate::application::handlers::settings::{
    GetSettingsHandler, UpdateSettingsCommand, UpdateSettingsHandler,
};
use crate::domain::scheduling::CalendarConfigData;
use crate::domain::CalendarKey;

use super::dto::{SettingsResponse, UpdateSettingsRequest, UpdateSettingsResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SettingsHandlers {
    get_handler: Arc<GetSettingsHandler>,
    update_handler: Arc<UpdateSettingsHandler>,
}

impl SettingsHandlers {
    pub fn new(
        get_handler: Arc<GetSettingsHandler>,
        update_handler: Arc<UpdateSettingsHandler>,
    ) -> Self {
        Self {
            get_handler,
            update_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/settings - both calendars' configurations
pub async fn get_settings(State(handlers): State<SettingsHandlers>) -> Response {
    let settings = handlers.get_handler.handle().await;
    (
        StatusCode::OK,
        Json(SettingsResponse::from_settings(settings)),
    )
        .into_response()
}

/// PUT /api/settings - replace one calendar's configuration
pub async fn put_settings(
    State(handlers): State<SettingsHandlers>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Response {
    let calendar = match request.calendar.as_deref() {
        Some(value) => match value.parse::<CalendarKey>() {
            Ok(calendar) => calendar,
            Err(e) => return bad_request(e.to_string()),
        },
        None => return bad_request("calendar is required"),
    };

    let cmd = UpdateSettingsCommand {
        calendar,
        config: request.config.into_config(),
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(stored) => (
            StatusCode::OK,
            Json(UpdateSettingsResponse {
                calendar,
                config: CalendarConfigData::from_config(&stored),
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}
