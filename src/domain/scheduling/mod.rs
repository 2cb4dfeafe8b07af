//! Scheduling domain: calendar configuration, slot generation and
//! slot validation.
//!
//! Everything in this module is pure. The current instant is always an
//! explicit input so the logic can be exercised without a clock.

mod config;
mod slots;
mod validate;

pub use config::{
    CalendarConfig, CalendarConfigData, RawWindow, WeeklyHours, Window, MAX_SLOT_MINUTES,
    MAX_WEEKS_AHEAD, MIN_SLOT_MINUTES, MIN_WEEKS_AHEAD,
};
pub use slots::{generate_slots, BusyInterval, Slot, MIN_BUSY_MINUTES};
pub use validate::is_bookable_start;
