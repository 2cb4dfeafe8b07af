//! HTTP routes for availability endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_availability, get_booking_context, AvailabilityHandlers};

/// Creates the availability router.
pub fn availability_routes(handlers: AvailabilityHandlers) -> Router {
    Router::new()
        .route("/availability", get(get_availability))
        .route("/context", get(get_booking_context))
        .with_state(handlers)
}
