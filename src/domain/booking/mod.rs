//! Booking domain: the persisted session/reservation pair and the
//! outcome of a booking attempt.

mod receipt;
mod session;

pub use receipt::{BookingReceipt, SideEffectOutcome};
pub use session::{NewBooking, Reservation, Session, SessionTimes};
