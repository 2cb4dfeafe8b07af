//! HTTP routes for the booking endpoint.

use axum::{routing::post, Router};

use super::handlers::{book_slot, BookingHandlers};

/// Creates the booking router.
pub fn booking_routes(handlers: BookingHandlers) -> Router {
    Router::new()
        .route("/book", post(book_slot))
        .with_state(handlers)
}
