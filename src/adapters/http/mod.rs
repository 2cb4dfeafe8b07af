//! HTTP adapters - axum resource modules and the composed router.

pub mod availability;
pub mod booking;
pub mod error;
pub mod settings;
pub mod tenancy;

use axum::{routing::get, Json, Router};

pub use availability::AvailabilityHandlers;
pub use booking::BookingHandlers;
pub use settings::SettingsHandlers;

/// Assembles the full application router.
pub fn api_router(
    availability: AvailabilityHandlers,
    booking: BookingHandlers,
    settings: SettingsHandlers,
) -> Router {
    let api = availability::availability_routes(availability)
        .merge(booking::booking_routes(booking))
        .merge(settings::settings_routes(settings));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
