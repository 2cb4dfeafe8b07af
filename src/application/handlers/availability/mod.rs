//! Availability handlers.

mod get_booking_context;
mod list_availability;

pub use get_booking_context::{
    BookingContextQuery, BookingContextView, GetBookingContextHandler,
};
pub use list_availability::{AvailabilityQuery, AvailabilityView, ListAvailabilityHandler};
