//! Slot generation over a configured horizon.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use super::config::CalendarConfig;

/// Floor for the occupancy assumption of an existing booking, in
/// minutes. A recorded session blocks at least this much time (exam
/// plus retry), whatever the configured slot length.
pub const MIN_BUSY_MINUTES: u32 = 60;

/// A time range already occupied by an existing booking, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BusyInterval {
    /// Builds the conservative occupancy interval for a recorded start.
    pub fn from_start(start: NaiveDateTime, slot_minutes: u32) -> Self {
        let minutes = slot_minutes.max(MIN_BUSY_MINUTES);
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    /// Half-open interval overlap test.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

/// A candidate bookable time range, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Slot {
    /// Derived identifier, date and time of the start encoded together.
    pub fn id(&self) -> String {
        self.start.format("%Y%m%d%H%M").to_string()
    }

    /// The calendar date the slot falls on.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Human label for the embedded page, e.g. `09:00 - 10:00`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Expands a configuration into the ordered list of still-open slots.
///
/// Covers `[today, today + weeks_ahead * 7 days]`. A slot is emitted
/// only when it fits its window entirely, starts strictly in the future
/// and overlaps no busy interval. Output is chronological by
/// construction.
pub fn generate_slots(
    config: &CalendarConfig,
    busy: &[BusyInterval],
    now: NaiveDateTime,
) -> Vec<Slot> {
    let step = Duration::minutes(i64::from(config.slot_minutes));
    let today = now.date();
    let horizon_days = i64::from(config.weeks_ahead) * 7;

    let mut slots = Vec::new();
    for offset in 0..=horizon_days {
        let day = today + Duration::days(offset);
        if config.closed_dates.contains(&day) {
            continue;
        }
        for window in config.week.for_weekday(day.weekday()) {
            let window_end = day.and_time(window.end);
            let mut start = day.and_time(window.start);
            while start + step <= window_end {
                let end = start + step;
                if start > now && !busy.iter().any(|b| b.overlaps(start, end)) {
                    slots.push(Slot { start, end });
                }
                start = end;
            }
        }
    }
    slots
}
